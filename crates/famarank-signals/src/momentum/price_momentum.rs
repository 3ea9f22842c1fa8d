//! Momentum as the percentage change in close over a fixed number of observations.

use famarank_traits::{Factor, FactorKind, InstrumentSeries, RankDirection, stats::ratio};
use serde::{Deserialize, Serialize};

/// Configuration for the price momentum factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceMomentumConfig {
    /// Number of monthly observations to look back (default: 12)
    pub lookback_months: usize,
}

impl Default for PriceMomentumConfig {
    fn default() -> Self {
        Self { lookback_months: 12 }
    }
}

/// Price momentum: `close[t] / close[t - lookback] - 1`.
///
/// Observations are counted per instrument row, not by calendar distance.
/// The first `lookback` rows have no value.
#[derive(Debug, Clone, Default)]
pub struct PriceMomentum {
    config: PriceMomentumConfig,
}

impl PriceMomentum {
    /// Create a new momentum factor with the given configuration.
    #[must_use]
    pub const fn new(config: PriceMomentumConfig) -> Self {
        Self { config }
    }

    /// Get the lookback period in monthly observations.
    #[must_use]
    pub const fn lookback_months(&self) -> usize {
        self.config.lookback_months
    }
}

impl Factor for PriceMomentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn kind(&self) -> FactorKind {
        FactorKind::Momentum
    }

    fn direction(&self) -> RankDirection {
        RankDirection::Ascending
    }

    fn lookback(&self) -> usize {
        self.config.lookback_months
    }

    fn required_columns(&self) -> &[&str] {
        &["close"]
    }

    fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>> {
        let n = self.config.lookback_months;
        (0..series.close.len())
            .map(|i| {
                if n == 0 || i < n {
                    return None;
                }
                ratio(series.close[i], series.close[i - n]).map(|growth| growth - 1.0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use famarank_traits::InstrumentId;

    fn series(closes: Vec<Option<f64>>) -> InstrumentSeries {
        InstrumentSeries {
            dates: vec![Default::default(); closes.len()],
            close: closes,
            ..InstrumentSeries::new(InstrumentId(1))
        }
    }

    #[test]
    fn test_default_config() {
        let factor = PriceMomentum::default();
        assert_eq!(factor.lookback_months(), 12);
        assert_eq!(factor.lookback(), 12);
    }

    #[test]
    fn test_needs_thirteen_rows() {
        let closes: Vec<_> = (1..=13).map(|v| Some(f64::from(v))).collect();
        let values = PriceMomentum::default().compute(&series(closes));

        assert!(values[..12].iter().all(Option::is_none));
        assert_relative_eq!(values[12].unwrap(), 12.0);
    }

    #[test]
    fn test_short_lookback_with_gaps() {
        let factor = PriceMomentum::new(PriceMomentumConfig { lookback_months: 1 });
        let values = factor.compute(&series(vec![Some(10.0), Some(11.0), None, Some(12.0)]));

        assert_eq!(values[0], None);
        assert_relative_eq!(values[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(values[2], None);
        assert_eq!(values[3], None);
    }
}
