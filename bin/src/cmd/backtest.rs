//! Backtest command implementation.

use anyhow::Result;
use famarank::{Pipeline, PipelineConfig};
use famarank_eval::BacktestReport;
use serde_json::json;

use super::{banner, fmt_opt};

/// Backtest the stored ranking over the configured grid.
pub(crate) fn backtest(config: &PipelineConfig, format: &str, summary: bool) -> Result<()> {
    let pipeline = Pipeline::new(config.store(), config.backtest.clone());
    let report = pipeline.backtest()?;

    if format == "json" {
        let failures: Vec<_> = report
            .failures()
            .map(|(unit, e)| {
                json!({
                    "factor": unit.factor,
                    "holding_period": unit.holding_period,
                    "error": e.to_string(),
                })
            })
            .collect();
        let json = serde_json::to_string_pretty(&json!({
            "metrics": report.metrics_rows(),
            "failures": failures,
        }))?;
        println!("{json}");
    } else {
        banner("Quartile Backtest");
        print_report(&report, summary);
    }
    Ok(())
}

/// Text rendering of a backtest report.
pub(crate) fn print_report(report: &BacktestReport, summary: bool) {
    for (unit, result) in report.successes() {
        println!("{} / {}", unit.factor, unit.holding_period);
        println!("{}", "━".repeat(60));
        println!(
            "  {:>8} {:>10} {:>10} {:>10} {:>10} {:>6}",
            "Quartile", "Mean", "Std", "Sharpe", "Close", "Obs"
        );
        for m in &result.metrics {
            println!(
                "  {:>8} {:>10} {:>10} {:>10} {:>10} {:>6}",
                m.quartile.to_string(),
                fmt_opt(m.mean, 4),
                fmt_opt(m.std, 4),
                fmt_opt(m.sharpe, 3),
                fmt_opt(m.mean_close, 2),
                m.observations
            );
        }

        if summary {
            println!();
            println!(
                "  {:>8} {:>7} {:>17} {:>17} {:>7} {:>7}",
                "Quartile", "Count", "Factor rank", "Re-rank", ">Mean", ">Med"
            );
            for s in &result.summary {
                println!(
                    "  {:>8} {:>7} {:>8.3}-{:<8.3} {:>8.3}-{:<8.3} {:>7} {:>7}",
                    s.quartile.to_string(),
                    s.count,
                    s.factor_rank_min,
                    s.factor_rank_max,
                    s.rank_min,
                    s.rank_max,
                    s.above_mean,
                    s.above_median
                );
            }
        }
        println!();
    }

    if report.failure_count() > 0 {
        println!("Failed units:");
        for (unit, e) in report.failures() {
            println!("  {} / {}: {e}", unit.factor, unit.holding_period);
        }
        println!();
    }
}
