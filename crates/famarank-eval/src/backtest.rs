//! Backtest grid over rank columns and holding periods.
//!
//! Every (rank column, holding period) pair is an independent unit. A unit
//! that fails validation is reported and skipped; results of the other units
//! are kept.

use famarank_traits::{FactorKind, FamaError, HoldingPeriod, MetricsRow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::{
    metrics::{QuartileMetrics, quartile_metrics},
    portfolio::{BacktestPanel, PortfolioReturns, portfolio_returns},
    summary::{QuartileSummary, quartile_summary},
};

/// Configuration for the backtest grid.
///
/// Names are kept as strings so that unknown entries surface as per-unit
/// validation errors rather than configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Rank columns to form portfolios on
    pub rank_columns: Vec<String>,
    /// Holding period labels
    pub holding_periods: Vec<String>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            rank_columns: FactorKind::ALL
                .iter()
                .map(|k| k.rank_column().to_string())
                .collect(),
            holding_periods: HoldingPeriod::ALL
                .iter()
                .map(|p| p.label().to_string())
                .collect(),
        }
    }
}

/// Results of one successful unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitResult {
    /// Quartile assignments and per-date returns.
    pub returns: PortfolioReturns,
    /// Per-quartile metrics.
    pub metrics: Vec<QuartileMetrics>,
    /// Per-quartile membership statistics.
    pub summary: Vec<QuartileSummary>,
}

/// Outcome of one (rank column, holding period) unit.
#[derive(Debug)]
pub struct UnitOutcome {
    /// Requested rank column.
    pub factor: String,
    /// Requested holding period label.
    pub holding_period: String,
    /// Unit result or the error that aborted it.
    pub result: Result<UnitResult>,
}

/// Outcomes of every unit, in grid order.
#[derive(Debug, Default)]
pub struct BacktestReport {
    /// One outcome per unit.
    pub outcomes: Vec<UnitOutcome>,
}

impl BacktestReport {
    /// Metrics rows of every successful unit.
    #[must_use]
    pub fn metrics_rows(&self) -> Vec<MetricsRow> {
        self.successes()
            .flat_map(|(outcome, result)| {
                result
                    .metrics
                    .iter()
                    .map(|m| m.to_row(&outcome.factor, result.returns.holding_period))
            })
            .collect()
    }

    /// Successful units with their results.
    pub fn successes(&self) -> impl Iterator<Item = (&UnitOutcome, &UnitResult)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o, r)))
    }

    /// Failed units with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&UnitOutcome, &FamaError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    /// Number of failed units.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Runs the portfolio engine over a grid of units.
#[derive(Debug, Clone, Default)]
pub struct FactorBacktest {
    config: BacktestConfig,
}

impl FactorBacktest {
    /// Create a new backtest with the given configuration.
    #[must_use]
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// The grid configuration.
    #[must_use]
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs every unit of the grid against `panel`.
    #[must_use]
    pub fn run(&self, panel: &BacktestPanel) -> BacktestReport {
        let mut report = BacktestReport::default();
        for factor in &self.config.rank_columns {
            for period in &self.config.holding_periods {
                let span = info_span!("backtest_unit", factor = %factor, holding_period = %period);
                let result = span.in_scope(|| run_unit(panel, factor, period));

                match &result {
                    Ok(unit) => debug!(
                        factor = %factor,
                        holding_period = %period,
                        quartiles = unit.metrics.len(),
                        "backtest unit finished"
                    ),
                    Err(e) => warn!("Error processing {factor} for {period}: {e}"),
                }
                report.outcomes.push(UnitOutcome {
                    factor: factor.clone(),
                    holding_period: period.clone(),
                    result,
                });
            }
        }

        info!(
            units = report.outcomes.len(),
            failed = report.failure_count(),
            "backtest finished"
        );
        report
    }
}

fn run_unit(panel: &BacktestPanel, factor: &str, period: &str) -> Result<UnitResult> {
    let returns = portfolio_returns(panel, factor, period)?;
    Ok(UnitResult {
        metrics: quartile_metrics(&returns),
        summary: quartile_summary(&returns),
        returns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use famarank_traits::{FactorRanks, InstrumentId};

    use crate::portfolio::PanelRow;

    fn panel(columns: Vec<FactorKind>) -> BacktestPanel {
        let mut rows = Vec::new();
        for id in 1..=8_i64 {
            for m in 0..6_u32 {
                let rank = id as f64 / 8.0;
                rows.push(PanelRow {
                    instrument: InstrumentId(id),
                    date: NaiveDate::from_ymd_opt(2020, m + 1, 1).unwrap(),
                    close: Some(10.0 + id as f64 + f64::from(m) * id as f64 * 0.1),
                    ranks: FactorRanks {
                        size: Some(rank),
                        value: Some(rank),
                        profitability: Some(rank),
                        momentum: Some(rank),
                        volatility: Some(rank),
                    },
                });
            }
        }
        BacktestPanel::from_rows(columns, rows)
    }

    #[test]
    fn test_default_grid() {
        let config = BacktestConfig::default();
        assert_eq!(config.rank_columns.len(), 5);
        assert_eq!(config.holding_periods, vec!["quarterly", "yearly", "2_years", "3_years", "5_years"]);
    }

    #[test]
    fn test_missing_column_fails_only_its_units() {
        let without_value: Vec<_> = FactorKind::ALL
            .into_iter()
            .filter(|k| *k != FactorKind::Value)
            .collect();
        let backtest = FactorBacktest::new(BacktestConfig {
            rank_columns: vec!["size_rank".into(), "value_rank".into(), "momentum_rank".into()],
            holding_periods: vec!["quarterly".into()],
        });

        let report = backtest.run(&panel(without_value));
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.failure_count(), 1);

        let (failed, err) = report.failures().next().unwrap();
        assert_eq!(failed.factor, "value_rank");
        assert!(matches!(err, FamaError::MissingColumn(_)));

        let rows = report.metrics_rows();
        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|r| r.factor != "value_rank"));
        assert!(rows.iter().any(|r| r.factor == "momentum_rank"));
    }

    #[test]
    fn test_unknown_period_is_isolated() {
        let backtest = FactorBacktest::new(BacktestConfig {
            rank_columns: vec!["size_rank".into()],
            holding_periods: vec!["weekly".into(), "quarterly".into()],
        });
        let report = backtest.run(&panel(FactorKind::ALL.to_vec()));

        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.successes().count(), 1);
        let (_, unit) = report.successes().next().unwrap();
        assert_eq!(unit.metrics.len(), 4);
        assert_eq!(unit.summary.len(), 4);
    }
}
