//! Per-quartile performance metrics.

use famarank_traits::{
    HoldingPeriod, MetricsRow, Quartile,
    stats::{mean, sample_std},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::portfolio::PortfolioReturns;

/// Performance of one quartile across all dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartileMetrics {
    /// Quartile.
    pub quartile: Quartile,
    /// Mean of the per-date mean holding returns.
    pub mean: Option<f64>,
    /// Sample standard deviation of the per-date means.
    pub std: Option<f64>,
    /// `mean / std`, unannualised.
    ///
    /// Infinite, or NaN for `0 / 0`, when `std` is zero.
    pub sharpe: Option<f64>,
    /// Mean close of the quartile's members over all dates.
    pub mean_close: Option<f64>,
    /// Number of dates with a mean holding return.
    pub observations: usize,
}

impl QuartileMetrics {
    /// Converts to an output row labelled with its rank column and period.
    #[must_use]
    pub fn to_row(&self, factor: &str, holding_period: HoldingPeriod) -> MetricsRow {
        MetricsRow {
            factor: factor.to_string(),
            holding_period,
            quartile: self.quartile,
            mean: self.mean,
            std: self.std,
            sharpe: self.sharpe,
            mean_close: self.mean_close,
            observations: self.observations,
        }
    }
}

/// Computes metrics for each quartile that has at least one member.
///
/// Quartiles are returned in ascending order.
#[must_use]
pub fn quartile_metrics(returns: &PortfolioReturns) -> Vec<QuartileMetrics> {
    let mut out = Vec::with_capacity(Quartile::ALL.len());
    for quartile in Quartile::ALL {
        let closes: Vec<f64> = returns
            .assignments
            .iter()
            .filter(|a| a.quartile == quartile)
            .filter_map(|a| a.close)
            .collect();
        let means: Vec<f64> = returns
            .returns
            .iter()
            .filter(|r| r.quartile == quartile)
            .filter_map(|r| r.mean_return)
            .collect();
        let has_members = returns.returns.iter().any(|r| r.quartile == quartile);
        if !has_members {
            continue;
        }

        let mean_return = mean(&means);
        let std = sample_std(&means);
        let sharpe = match (mean_return, std) {
            (Some(m), Some(s)) => {
                if s == 0.0 {
                    warn!(
                        factor = %returns.factor,
                        holding_period = %returns.holding_period,
                        %quartile,
                        "zero standard deviation, ratio is not finite"
                    );
                }
                Some(m / s)
            }
            _ => None,
        };

        out.push(QuartileMetrics {
            quartile,
            mean: mean_return,
            std,
            sharpe,
            mean_close: mean(&closes),
            observations: means.len(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use famarank_traits::{FactorKind, InstrumentId};

    use crate::portfolio::{PortfolioAssignment, QuartileReturn};

    fn q(n: u8) -> Quartile {
        Quartile::new(n).unwrap()
    }

    fn returns(values: &[(u32, u8, Option<f64>)]) -> PortfolioReturns {
        let date = |m: u32| NaiveDate::from_ymd_opt(2022, m, 1).unwrap();
        PortfolioReturns {
            factor: FactorKind::Size,
            holding_period: HoldingPeriod::Quarterly,
            assignments: values
                .iter()
                .map(|(m, quartile, r)| PortfolioAssignment {
                    instrument: InstrumentId(1),
                    date: date(*m),
                    factor_rank: 0.5,
                    rank: 0.5,
                    quartile: q(*quartile),
                    close: Some(f64::from(*m) * 10.0),
                    simple_return: None,
                    holding_return: *r,
                })
                .collect(),
            returns: values
                .iter()
                .map(|(m, quartile, r)| QuartileReturn {
                    date: date(*m),
                    quartile: q(*quartile),
                    mean_return: *r,
                    members: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_mean_std_sharpe() {
        let input = returns(&[(1, 1, Some(0.01)), (2, 1, Some(0.03)), (3, 1, None)]);
        let metrics = quartile_metrics(&input);
        assert_eq!(metrics.len(), 1);

        let m = metrics[0];
        assert_eq!(m.quartile, q(1));
        assert_eq!(m.observations, 2);
        assert_relative_eq!(m.mean.unwrap(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(m.std.unwrap(), 0.02_f64.sqrt() / 10.0, epsilon = 1e-12);
        assert_relative_eq!(m.sharpe.unwrap(), 0.02 / (0.02_f64.sqrt() / 10.0), epsilon = 1e-9);
        assert_relative_eq!(m.mean_close.unwrap(), 20.0);
    }

    #[test]
    fn test_zero_std_gives_infinite_ratio() {
        let input = returns(&[(1, 2, Some(0.05)), (2, 2, Some(0.05))]);
        let m = quartile_metrics(&input)[0];

        assert_eq!(m.std, Some(0.0));
        assert!(m.sharpe.unwrap().is_infinite());
    }

    #[test]
    fn test_single_observation() {
        let input = returns(&[(1, 4, Some(0.05))]);
        let m = quartile_metrics(&input)[0];

        assert_eq!(m.mean, Some(0.05));
        assert_eq!(m.std, None);
        assert_eq!(m.sharpe, None);
    }

    #[test]
    fn test_to_row() {
        let input = returns(&[(1, 3, Some(0.05))]);
        let row = quartile_metrics(&input)[0].to_row("size_rank", HoldingPeriod::Quarterly);
        assert_eq!(row.factor, "size_rank");
        assert_eq!(row.quartile, q(3));
        assert_eq!(row.observations, 1);
    }
}
