//! Percentile ranks with averaged ties.

use serde::{Deserialize, Serialize};

use crate::method::{RankMethod, degenerate, population};

/// Configuration for percentile ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PercentileConfig {
    /// Rank the smallest value highest
    pub descending: bool,
}

/// Percentile rank: ordinal rank over the count of ranked values.
///
/// Ties receive the average of their ordinal positions, so the ranks of
/// `[1, 2, 2, 3]` are `[0.25, 0.625, 0.625, 1.0]`.
///
/// # Examples
///
/// ```rust
/// use famarank_rank::{PercentileRank, RankMethod};
///
/// let ranks = PercentileRank::default().rank(&[Some(3.0), Some(1.0), None]);
/// assert_eq!(ranks, vec![Some(1.0), Some(0.5), None]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PercentileRank {
    config: PercentileConfig,
}

impl PercentileRank {
    /// Create a new percentile ranker with the given configuration.
    #[must_use]
    pub const fn new(config: PercentileConfig) -> Self {
        Self { config }
    }

    /// Whether the smallest value ranks highest.
    #[must_use]
    pub const fn descending(&self) -> bool {
        self.config.descending
    }
}

impl RankMethod for PercentileRank {
    fn rank(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut pop = population(values);
        if let Some(out) = degenerate(values.len(), &pop) {
            return out;
        }

        if self.config.descending {
            pop.sort_by(|a, b| b.1.total_cmp(&a.1));
        } else {
            pop.sort_by(|a, b| a.1.total_cmp(&b.1));
        }

        let n = pop.len() as f64;
        let mut out = vec![None; values.len()];
        let mut start = 0;
        while start < pop.len() {
            let mut end = start + 1;
            while end < pop.len() && pop[end].1 == pop[start].1 {
                end += 1;
            }
            // Average of the 1-based positions start+1..=end
            let average = (start + 1 + end) as f64 / 2.0;
            for (i, _) in &pop[start..end] {
                out[*i] = Some(average / n);
            }
            start = end;
        }
        out
    }

    fn name(&self) -> &str {
        if self.config.descending {
            "percentile_desc"
        } else {
            "percentile"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ranks(method: &PercentileRank, values: &[f64]) -> Vec<f64> {
        let input: Vec<_> = values.iter().map(|v| Some(*v)).collect();
        method.rank(&input).into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_ascending_with_ties() {
        let out = ranks(&PercentileRank::default(), &[1.0, 2.0, 2.0, 3.0]);
        assert_relative_eq!(out[0], 0.25);
        assert_relative_eq!(out[1], 0.625);
        assert_relative_eq!(out[2], 0.625);
        assert_relative_eq!(out[3], 1.0);
    }

    #[test]
    fn test_descending() {
        let method = PercentileRank::new(PercentileConfig { descending: true });
        let out = ranks(&method, &[0.1, 0.5, 0.3]);
        assert_relative_eq!(out[0], 1.0);
        assert_relative_eq!(out[1], 1.0 / 3.0);
        assert_relative_eq!(out[2], 2.0 / 3.0);
    }

    #[test]
    fn test_monotone_and_bounded() {
        let values = [5.0, -3.0, 12.0, 0.0, 7.5, 7.5, 100.0, -40.0];
        let out = ranks(&PercentileRank::default(), &values);

        for (i, a) in values.iter().enumerate() {
            assert!((0.0..=1.0).contains(&out[i]));
            for (j, b) in values.iter().enumerate() {
                if a < b {
                    assert!(out[i] <= out[j]);
                }
            }
        }
    }

    #[test]
    fn test_missing_excluded_from_count() {
        let out = PercentileRank::default().rank(&[Some(1.0), None, Some(f64::NAN), Some(2.0)]);
        assert_eq!(out, vec![Some(0.5), None, None, Some(1.0)]);
    }

    #[test]
    fn test_constant_values_rank_zero() {
        let out = PercentileRank::default().rank(&[Some(4.0), Some(4.0), None]);
        assert_eq!(out, vec![Some(0.0), Some(0.0), None]);

        let single = PercentileRank::default().rank(&[Some(9.0)]);
        assert_eq!(single, vec![Some(0.0)]);
    }
}
