//! Trailing standard deviation of close prices.

use famarank_traits::{Factor, FactorKind, InstrumentSeries, RankDirection, stats::sample_std};
use serde::{Deserialize, Serialize};

/// Configuration for the volatility factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceVolatilityConfig {
    /// Number of closes in the window (default: 12)
    pub window_months: usize,
}

impl Default for PriceVolatilityConfig {
    fn default() -> Self {
        Self { window_months: 12 }
    }
}

/// Sample standard deviation of the last `window` closes.
///
/// Ranked descending: the least volatile instrument ranks highest. A missing
/// close inside the window makes the value missing.
#[derive(Debug, Clone, Default)]
pub struct PriceVolatility {
    config: PriceVolatilityConfig,
}

impl PriceVolatility {
    /// Create a new volatility factor with the given configuration.
    #[must_use]
    pub const fn new(config: PriceVolatilityConfig) -> Self {
        Self { config }
    }
}

impl Factor for PriceVolatility {
    fn name(&self) -> &str {
        "volatility"
    }

    fn kind(&self) -> FactorKind {
        FactorKind::Volatility
    }

    fn direction(&self) -> RankDirection {
        RankDirection::Descending
    }

    fn lookback(&self) -> usize {
        self.config.window_months
    }

    fn required_columns(&self) -> &[&str] {
        &["close"]
    }

    fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>> {
        let n = self.config.window_months;
        (0..series.close.len())
            .map(|i| {
                if n == 0 || i + 1 < n {
                    return None;
                }
                let window: Option<Vec<f64>> = series.close[i + 1 - n..=i].iter().copied().collect();
                window.and_then(|closes| sample_std(&closes))
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
    fn test_needs_twelve_rows() {
        let closes: Vec<_> = (1..=12).map(|v| Some(f64::from(v))).collect();
        let values = PriceVolatility::default().compute(&series(closes));

        assert!(values[..11].iter().all(Option::is_none));
        // Sample std of 1..=12 is sqrt(13)
        assert_relative_eq!(values[11].unwrap(), 13.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(PriceVolatility::default().direction(), RankDirection::Descending);
    }

    #[test]
    fn test_missing_close_in_window() {
        let factor = PriceVolatility::new(PriceVolatilityConfig { window_months: 2 });
        let values = factor.compute(&series(vec![Some(1.0), None, Some(3.0), Some(5.0)]));
        assert_eq!(values[1], None);
        assert_eq!(values[2], None);
        assert_relative_eq!(values[3].unwrap(), 2.0_f64.sqrt(), epsilon = 1e-12);
    }
}
