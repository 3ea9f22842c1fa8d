//! Full pipeline command implementation.

use anyhow::Result;
use famarank::{Pipeline, PipelineConfig};
use famarank_data::files;

use super::{backtest::print_report, banner, rank::print_coverage};

/// Rank, then backtest the fresh ranking.
pub(crate) fn run(config: &PipelineConfig, summary: bool) -> Result<()> {
    banner("Factor Ranking and Backtest");

    let store = config.store();
    let rankings = store.output_path(files::RANKINGS);
    let metrics = store.output_path(files::METRICS_CSV);
    let pipeline = Pipeline::new(store, config.backtest.clone());
    let output = pipeline.run()?;

    print_coverage(&output.ranking);
    print_report(&output.report, summary);

    println!("Ranking:  {}", rankings.display());
    println!("Metrics:  {}\n", metrics.display());
    Ok(())
}
