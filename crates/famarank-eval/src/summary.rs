//! Descriptive statistics of each quartile's membership.

use famarank_traits::{
    Quartile,
    stats::{mean, median},
};
use serde::{Deserialize, Serialize};

use crate::portfolio::PortfolioReturns;

/// Rank ranges and return counts of one quartile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartileSummary {
    /// Quartile.
    pub quartile: Quartile,
    /// Number of (instrument, date) members.
    pub count: usize,
    /// Smallest rank read from the ranking table.
    pub factor_rank_min: f64,
    /// Largest rank read from the ranking table.
    pub factor_rank_max: f64,
    /// Median rank read from the ranking table.
    pub factor_rank_median: f64,
    /// Smallest within-date re-rank.
    pub rank_min: f64,
    /// Largest within-date re-rank.
    pub rank_max: f64,
    /// Median within-date re-rank.
    pub rank_median: f64,
    /// Members whose holding return exceeds the mean over all quartiles.
    pub above_mean: usize,
    /// Members whose holding return exceeds the median over all quartiles.
    pub above_median: usize,
}

/// Summarises every non-empty quartile, in ascending order.
#[must_use]
pub fn quartile_summary(returns: &PortfolioReturns) -> Vec<QuartileSummary> {
    let all: Vec<f64> = returns
        .assignments
        .iter()
        .filter_map(|a| a.holding_return)
        .collect();
    let overall_mean = mean(&all);
    let overall_median = median(&all);
    let above = |threshold: Option<f64>, r: Option<f64>| {
        matches!((threshold, r), (Some(t), Some(r)) if r > t)
    };

    Quartile::ALL
        .into_iter()
        .filter_map(|quartile| {
            let members: Vec<_> = returns
                .assignments
                .iter()
                .filter(|a| a.quartile == quartile)
                .collect();
            let factor_ranks: Vec<f64> = members.iter().map(|a| a.factor_rank).collect();
            let ranks: Vec<f64> = members.iter().map(|a| a.rank).collect();

            Some(QuartileSummary {
                quartile,
                count: members.len(),
                factor_rank_min: factor_ranks.iter().copied().reduce(f64::min)?,
                factor_rank_max: factor_ranks.iter().copied().reduce(f64::max)?,
                factor_rank_median: median(&factor_ranks)?,
                rank_min: ranks.iter().copied().reduce(f64::min)?,
                rank_max: ranks.iter().copied().reduce(f64::max)?,
                rank_median: median(&ranks)?,
                above_mean: members
                    .iter()
                    .filter(|a| above(overall_mean, a.holding_return))
                    .count(),
                above_median: members
                    .iter()
                    .filter(|a| above(overall_median, a.holding_return))
                    .count(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use famarank_traits::{FactorKind, HoldingPeriod, InstrumentId};

    use crate::portfolio::PortfolioAssignment;

    fn assignment(id: i64, factor_rank: f64, rank: f64, r: Option<f64>) -> PortfolioAssignment {
        PortfolioAssignment {
            instrument: InstrumentId(id),
            date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            factor_rank,
            rank,
            quartile: Quartile::from_rank(rank).unwrap(),
            close: None,
            simple_return: None,
            holding_return: r,
        }
    }

    #[test]
    fn test_summary_per_quartile() {
        let returns = PortfolioReturns {
            factor: FactorKind::Value,
            holding_period: HoldingPeriod::Yearly,
            assignments: vec![
                assignment(1, 0.1, 0.2, Some(0.01)),
                assignment(2, 0.0, 0.1, Some(0.02)),
                assignment(3, 0.9, 0.9, Some(0.10)),
                assignment(4, 1.0, 1.0, None),
            ],
            returns: Vec::new(),
        };
        let summary = quartile_summary(&returns);
        assert_eq!(summary.len(), 2);

        let low = summary[0];
        assert_eq!(low.quartile.get(), 1);
        assert_eq!(low.count, 2);
        assert_eq!(low.factor_rank_min, 0.0);
        assert_eq!(low.factor_rank_max, 0.1);
        assert!((low.rank_median - 0.15).abs() < 1e-12);
        // Overall mean is 0.13 / 3, median 0.02.
        assert_eq!(low.above_mean, 0);
        assert_eq!(low.above_median, 0);

        let high = summary[1];
        assert_eq!(high.quartile.get(), 4);
        assert_eq!(high.count, 2);
        assert_eq!(high.above_mean, 1);
        assert_eq!(high.above_median, 1);
    }
}
