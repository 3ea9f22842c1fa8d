//! Ranking command implementation.

use anyhow::Result;
use famarank::{Pipeline, PipelineConfig};
use famarank_data::files;
use famarank_traits::RankingTable;

use super::banner;

/// Rank every factor and replace the stored ranking table.
pub(crate) fn rank(config: &PipelineConfig) -> Result<()> {
    banner("Factor Ranking");

    let store = config.store();
    let path = store.output_path(files::RANKINGS);
    let pipeline = Pipeline::new(store, config.backtest.clone());
    let ranking = pipeline.rank()?;

    print_coverage(&ranking);
    println!("Written to {}\n", path.display());
    Ok(())
}

/// Rows, dates and per-column coverage of a ranking table.
pub(crate) fn print_coverage(ranking: &RankingTable) {
    let mut dates: Vec<_> = ranking.rows().iter().map(|r| r.date).collect();
    dates.dedup();

    println!("Rows:     {}", ranking.len());
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => println!("Dates:    {} ({first} to {last})", dates.len()),
        _ => println!("Dates:    0"),
    }
    println!();
    println!("  {:20} {:>10}", "Column", "Ranked");
    for &kind in ranking.columns() {
        let ranked = ranking
            .rows()
            .iter()
            .filter(|r| r.ranks.get(kind).is_some())
            .count();
        println!("  {:20} {:>10}", kind.rank_column(), ranked);
    }
    println!();
}
