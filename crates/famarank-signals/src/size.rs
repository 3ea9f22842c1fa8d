//! Size factor: market capitalisation.

use famarank_traits::{Factor, FactorKind, InstrumentSeries, RankDirection, stats::product};

/// Market capitalisation, `close * number_of_shares`.
///
/// Ranked ascending, so the largest company ranks 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketCap;

impl Factor for MarketCap {
    fn name(&self) -> &str {
        "size"
    }

    fn kind(&self) -> FactorKind {
        FactorKind::Size
    }

    fn direction(&self) -> RankDirection {
        RankDirection::Ascending
    }

    fn lookback(&self) -> usize {
        0
    }

    fn required_columns(&self) -> &[&str] {
        &["close", "number_of_shares"]
    }

    fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>> {
        series
            .close
            .iter()
            .zip(&series.number_of_shares)
            .map(|(close, shares)| product(*close, *shares))
            .collect()
    }
}
