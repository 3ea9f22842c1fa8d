//! End-to-end pipeline runs over an in-memory store.

use std::{cell::RefCell, fs};

use approx::assert_relative_eq;
use chrono::NaiveDate;
use famarank::{
    FactorKind, Pipeline,
    data::{CsvStore, files},
    eval::BacktestConfig,
    traits::{
        IndexRow, InstrumentId, MetricsRow, PriceObservation, RankingTable, ReportObservation,
        TableStore,
    },
};

#[derive(Debug, thiserror::Error)]
#[error("no ranking has been stored")]
struct NoRanking;

#[derive(Debug, Default)]
struct MemoryStore {
    prices: Vec<PriceObservation>,
    reports: Vec<ReportObservation>,
    ranking: RefCell<Option<RankingTable>>,
    metrics: RefCell<Vec<MetricsRow>>,
    index: RefCell<Vec<IndexRow>>,
}

impl TableStore for MemoryStore {
    type Error = NoRanking;

    fn prices(&self) -> Result<Vec<PriceObservation>, NoRanking> {
        Ok(self.prices.clone())
    }

    fn reports(&self) -> Result<Vec<ReportObservation>, NoRanking> {
        Ok(self.reports.clone())
    }

    fn ranking(&self) -> Result<RankingTable, NoRanking> {
        self.ranking.borrow().clone().ok_or(NoRanking)
    }

    fn replace_ranking(&self, table: &RankingTable) -> Result<(), NoRanking> {
        *self.ranking.borrow_mut() = Some(table.clone());
        Ok(())
    }

    fn write_metrics(&self, rows: &[MetricsRow]) -> Result<(), NoRanking> {
        *self.metrics.borrow_mut() = rows.to_vec();
        Ok(())
    }

    fn write_index(&self, rows: &[IndexRow]) -> Result<(), NoRanking> {
        *self.index.borrow_mut() = rows.to_vec();
        Ok(())
    }
}

fn month(i: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2015 + (i / 12) as i32, i % 12 + 1, 1).unwrap()
}

fn synthetic_store() -> MemoryStore {
    let mut prices = Vec::new();
    let mut reports = Vec::new();
    for id in 1..=8_i64 {
        let drift = 1.0 + 0.004 * id as f64;
        for m in 0..48_u32 {
            let wobble = 1.0 + 0.03 * ((m as i64 * id) % 7) as f64 / 7.0;
            let close = 20.0 * drift.powi(m as i32) * wobble;
            prices.push(PriceObservation::new(InstrumentId(id), month(m), Some(close)));

            if m % 3 == 0 {
                let end = month(m + 3).pred_opt().unwrap();
                let mut report = ReportObservation::new(InstrumentId(id), month(m), end);
                report.items.number_of_shares = Some(1_000.0 * id as f64);
                report.items.operating_income = Some((id as f64 - 3.5) * 10.0 + f64::from(m));
                report.items.gross_income = Some(400.0 + 10.0 * id as f64);
                report.items.revenues = Some(1_000.0);
                report.items.earnings_per_share = Some(0.5);
                reports.push(report);
            }
        }
    }
    MemoryStore {
        prices,
        reports,
        ..MemoryStore::default()
    }
}

#[test]
fn test_run_writes_ranking_and_metrics() {
    let pipeline = Pipeline::new(synthetic_store(), BacktestConfig::default());
    let output = pipeline.run().unwrap();

    assert!(!output.ranking.is_empty());
    for row in output.ranking.rows() {
        for kind in FactorKind::ALL {
            if let Some(rank) = row.ranks.get(kind) {
                assert!((0.0..=1.0).contains(&rank), "{kind} rank {rank} out of range");
            }
        }
    }

    // Horizons longer than the history still succeed, with no observations.
    assert_eq!(output.report.outcomes.len(), 25);
    assert_eq!(output.report.failure_count(), 0);

    let metrics = pipeline.store().metrics.borrow();
    let momentum_quarterly: Vec<_> = metrics
        .iter()
        .filter(|r| r.factor == "momentum_rank" && r.holding_period.label() == "quarterly")
        .collect();
    assert_eq!(momentum_quarterly.len(), 4);
    assert!(momentum_quarterly.iter().all(|r| r.observations > 0));
}

#[test]
fn test_rerun_is_idempotent() {
    let pipeline = Pipeline::new(synthetic_store(), BacktestConfig::default());

    pipeline.run().unwrap();
    let first_ranking = pipeline.store().ranking().unwrap();
    let first_metrics = format!("{:?}", pipeline.store().metrics.borrow());

    pipeline.run().unwrap();
    let second_ranking = pipeline.store().ranking().unwrap();
    let second_metrics = format!("{:?}", pipeline.store().metrics.borrow());

    assert_eq!(first_ranking, second_ranking);
    assert_eq!(first_metrics, second_metrics);
}

#[test]
fn test_bad_rank_column_leaves_other_units_intact() {
    let config = BacktestConfig {
        rank_columns: vec![
            "size_rank".to_string(),
            "value_factor_rank".to_string(),
            "volatility_rank".to_string(),
        ],
        holding_periods: vec!["quarterly".to_string(), "yearly".to_string()],
    };
    let pipeline = Pipeline::new(synthetic_store(), config);
    pipeline.rank().unwrap();

    let report = pipeline.backtest().unwrap();
    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(report.failure_count(), 2);
    assert!(report.failures().all(|(unit, _)| unit.factor == "value_factor_rank"));

    let metrics = pipeline.store().metrics.borrow();
    assert!(metrics.iter().any(|r| r.factor == "size_rank"));
    assert!(metrics.iter().any(|r| r.factor == "volatility_rank"));
    assert!(metrics.iter().all(|r| r.factor != "value_factor_rank"));
}

#[test]
fn test_backtest_without_ranking_is_a_store_error() {
    let pipeline = Pipeline::new(synthetic_store(), BacktestConfig::default());
    assert!(matches!(
        pipeline.backtest(),
        Err(famarank::PipelineError::Store(_))
    ));
}

#[test]
fn test_single_instrument_date_ranks_zero() {
    let pipeline = Pipeline::new(MemoryStore::default(), BacktestConfig::default());
    let mut report = ReportObservation::new(InstrumentId(1), month(0), month(2));
    report.items.number_of_shares = Some(10.0);
    let prices = vec![PriceObservation::new(InstrumentId(1), month(0), Some(5.0))];

    let ranking = pipeline.compute_ranking(&prices, &[report]).unwrap();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking.rows()[0].ranks.size, Some(0.0));
}

#[test]
fn test_index_written() {
    let pipeline = Pipeline::new(synthetic_store(), BacktestConfig::default());
    let rows = pipeline.index().unwrap();

    assert_eq!(rows.len(), 48);
    assert_eq!(pipeline.store().index.borrow().len(), 48);
    assert!(rows.iter().all(|r| r.equal_weighted.is_some() && r.cap_weighted.is_some()));
}

#[test]
fn test_returns_are_monthly_between_report_months() {
    // Every close grows 10% a month; reports start only every third month.
    let mut store = MemoryStore::default();
    for id in 1..=2_i64 {
        for m in 0..14_u32 {
            let close = 100.0 * 1.1_f64.powi(m as i32);
            store.prices.push(PriceObservation::new(InstrumentId(id), month(m), Some(close)));
            if m % 3 == 0 {
                let end = month(m + 3).pred_opt().unwrap();
                let mut report = ReportObservation::new(InstrumentId(id), month(m), end);
                report.items.number_of_shares = Some(1_000.0 * id as f64);
                store.reports.push(report);
            }
        }
    }
    let config = BacktestConfig {
        rank_columns: vec!["size_rank".to_string()],
        holding_periods: vec!["quarterly".to_string()],
    };
    let pipeline = Pipeline::new(store, config);
    let output = pipeline.run().unwrap();

    let (_, unit) = output.report.successes().next().unwrap();
    let held: Vec<_> = unit
        .returns
        .assignments
        .iter()
        .filter(|a| a.instrument == InstrumentId(1))
        .collect();
    let dates: Vec<_> = held.iter().map(|a| a.date).collect();
    assert_eq!(dates, vec![month(0), month(3), month(6), month(9), month(12)]);

    assert_eq!(held[0].simple_return, None);
    for a in &held[1..] {
        assert_relative_eq!(a.simple_return.unwrap(), 0.1, epsilon = 1e-9);
        assert_relative_eq!(a.holding_return.unwrap(), 1.1_f64.powi(3) - 1.0, epsilon = 1e-9);
    }
}

fn output_bytes(store: &CsvStore) -> Vec<Vec<u8>> {
    [files::RANKINGS, files::METRICS_CSV, files::METRICS_JSON]
        .into_iter()
        .map(|name| fs::read(store.output_path(name)).unwrap())
        .collect()
}

#[test]
fn test_csv_outputs_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path().join("data"), dir.path().join("out"));
    let input = synthetic_store();
    store
        .write_prices(&store.data_path(files::PRICES), &input.prices)
        .unwrap();
    store
        .write_reports(&store.data_path(files::REPORTS), &input.reports)
        .unwrap();

    let pipeline = Pipeline::new(store, BacktestConfig::default());
    pipeline.run().unwrap();
    let first = output_bytes(pipeline.store());
    pipeline.run().unwrap();
    let second = output_bytes(pipeline.store());

    assert!(first.iter().all(|bytes| !bytes.is_empty()));
    assert_eq!(first, second);
}
