//! Resample command implementation.

use std::path::PathBuf;

use anyhow::{Result, bail};
use famarank::PipelineConfig;
use famarank_data::{CsvStore, files, resample_monthly};
use tracing::info;

use super::banner;

/// Resample a daily price table to month-start rows.
pub(crate) fn resample(
    config: &PipelineConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    banner("Monthly Resample");

    let store = config.store();
    let input = input.unwrap_or_else(|| store.data_path(files::DAILY_PRICES));
    let output = output.unwrap_or_else(|| store.data_path(files::PRICES));
    if input == output {
        bail!("input and output are the same file: {}", input.display());
    }

    let daily = CsvStore::read_prices(&input)?;
    let monthly = resample_monthly(&daily);
    info!(daily = daily.len(), monthly = monthly.len(), "resampled prices");
    store.write_prices(&output, &monthly)?;

    println!("Input:    {} ({} rows)", input.display(), daily.len());
    println!("Output:   {} ({} rows)\n", output.display(), monthly.len());
    Ok(())
}
