//! Operating earnings yield.

use famarank_traits::{Factor, FactorKind, InstrumentSeries, RankDirection, stats::ratio};

/// Rolling operating income per share.
#[must_use]
pub fn operating_earnings_per_share(
    rolling_operating_income: Option<f64>,
    number_of_shares: Option<f64>,
) -> Option<f64> {
    ratio(rolling_operating_income, number_of_shares)
}

/// Value factor: operating earnings per share over close.
///
/// Ranked with the sign-split rule: positive yields ascending, and
/// non-positive yields below them with the most negative ranked highest
/// among the non-positives.
///
/// # Example
///
/// ```ignore
/// use famarank_signals::value::OperatingEarningsYield;
///
/// let values = OperatingEarningsYield.compute(&series);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatingEarningsYield;

impl Factor for OperatingEarningsYield {
    fn name(&self) -> &str {
        "value"
    }

    fn kind(&self) -> FactorKind {
        FactorKind::Value
    }

    fn direction(&self) -> RankDirection {
        RankDirection::SignSplit
    }

    fn lookback(&self) -> usize {
        0
    }

    fn required_columns(&self) -> &[&str] {
        &["close", "number_of_shares", "operating_income"]
    }

    fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>> {
        series
            .rolling_operating_income
            .iter()
            .zip(&series.number_of_shares)
            .zip(&series.close)
            .map(|((income, shares), close)| {
                ratio(operating_earnings_per_share(*income, *shares), *close)
            })
            .collect()
    }
}
