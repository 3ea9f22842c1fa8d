//! End-to-end pipeline over a table store.
//!
//! Stages run strictly in order: rolling fundamentals, factor calculation,
//! cross-sectional ranking, then the backtest grid. Every stage is a pure
//! transformation; the store is only touched at the start and end of a run.

use famarank_eval::{BacktestConfig, BacktestPanel, BacktestReport, FactorBacktest, benchmark_indices};
use famarank_rank::CrossSectionRanker;
use famarank_signals::{FactorCalculator, RollingAggregator};
use famarank_traits::{IndexRow, PriceObservation, RankingTable, ReportObservation, TableStore};
use tracing::{info, info_span};

use crate::error::{PipelineError, Result};

/// Output of a full run.
#[derive(Debug)]
pub struct RunOutput {
    /// Ranking table written to the store.
    pub ranking: RankingTable,
    /// Backtest outcomes; metrics of successful units were written.
    pub report: BacktestReport,
}

/// Factor ranking and backtesting over a [`TableStore`].
#[derive(Debug)]
pub struct Pipeline<S> {
    store: S,
    aggregator: RollingAggregator,
    calculator: FactorCalculator,
    ranker: CrossSectionRanker,
    backtest: FactorBacktest,
}

impl<S: TableStore> Pipeline<S> {
    /// Create a pipeline with every default factor.
    #[must_use]
    pub fn new(store: S, backtest: BacktestConfig) -> Self {
        let calculator = FactorCalculator::default();
        let ranker = CrossSectionRanker::from_factors(calculator.factors());
        Self {
            store,
            aggregator: RollingAggregator::default(),
            calculator,
            ranker,
            backtest: FactorBacktest::new(backtest),
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Runs stages 1-3 on in-memory tables.
    ///
    /// # Errors
    ///
    /// Fails on duplicate price rows.
    pub fn compute_ranking(
        &self,
        prices: &[PriceObservation],
        reports: &[ReportObservation],
    ) -> Result<RankingTable> {
        let rolling = {
            let _span = info_span!("rolling_fundamentals").entered();
            self.aggregator.aggregate(reports)
        };
        let factors = {
            let _span = info_span!("factor_calculation").entered();
            self.calculator.compute(prices, &rolling)?
        };
        let _span = info_span!("ranking").entered();
        Ok(self.ranker.rank(&factors))
    }

    /// Loads the inputs, ranks every factor and replaces the stored ranking.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read or written, or on invalid input.
    pub fn rank(&self) -> Result<RankingTable> {
        let prices = self.store.prices().map_err(PipelineError::store)?;
        let reports = self.store.reports().map_err(PipelineError::store)?;
        info!(prices = prices.len(), reports = reports.len(), "loaded inputs");

        let ranking = self.compute_ranking(&prices, &reports)?;
        self.store
            .replace_ranking(&ranking)
            .map_err(PipelineError::store)?;
        info!(rows = ranking.len(), "ranking replaced");
        Ok(ranking)
    }

    /// Backtests the stored ranking and writes the metrics of every
    /// successful unit.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read or written. Failed units are
    /// reported in the returned [`BacktestReport`], not as an error.
    pub fn backtest(&self) -> Result<BacktestReport> {
        let ranking = self.store.ranking().map_err(PipelineError::store)?;
        let prices = self.store.prices().map_err(PipelineError::store)?;
        self.backtest_ranking(&ranking, &prices)
    }

    /// Full run: rank, then backtest the fresh ranking.
    ///
    /// # Errors
    ///
    /// See [`Self::rank`] and [`Self::backtest`].
    pub fn run(&self) -> Result<RunOutput> {
        let _span = info_span!("pipeline").entered();
        let ranking = self.rank()?;
        let prices = self.store.prices().map_err(PipelineError::store)?;
        let report = self.backtest_ranking(&ranking, &prices)?;
        Ok(RunOutput { ranking, report })
    }

    /// Computes and writes the benchmark indices.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read or written.
    pub fn index(&self) -> Result<Vec<IndexRow>> {
        let prices = self.store.prices().map_err(PipelineError::store)?;
        let reports = self.store.reports().map_err(PipelineError::store)?;
        let rows = benchmark_indices(&prices, &reports);
        self.store.write_index(&rows).map_err(PipelineError::store)?;
        info!(dates = rows.len(), "benchmark indices written");
        Ok(rows)
    }

    fn backtest_ranking(
        &self,
        ranking: &RankingTable,
        prices: &[PriceObservation],
    ) -> Result<BacktestReport> {
        let _span = info_span!("backtest").entered();
        let panel = BacktestPanel::join(ranking, prices);
        info!(rows = panel.len(), "joined ranking with prices");

        let report = self.backtest.run(&panel);
        self.store
            .write_metrics(&report.metrics_rows())
            .map_err(PipelineError::store)?;
        Ok(report)
    }
}
