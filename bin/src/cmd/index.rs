//! Benchmark index command implementation.

use anyhow::Result;
use famarank::{Pipeline, PipelineConfig};
use famarank_data::files;

use super::{banner, fmt_opt};

/// Compute and write the benchmark indices, printing the last `tail` rows.
pub(crate) fn index(config: &PipelineConfig, tail: usize) -> Result<()> {
    banner("Benchmark Indices");

    let store = config.store();
    let path = store.output_path(files::INDEX);
    let pipeline = Pipeline::new(store, config.backtest.clone());
    let rows = pipeline.index()?;

    println!("  {:12} {:>14} {:>14}", "Date", "Equal", "Cap-weighted");
    for row in &rows[rows.len().saturating_sub(tail)..] {
        println!(
            "  {:12} {:>14} {:>14}",
            row.date.to_string(),
            fmt_opt(row.equal_weighted, 2),
            fmt_opt(row.cap_weighted, 2)
        );
    }
    println!("\nWritten to {}\n", path.display());
    Ok(())
}
