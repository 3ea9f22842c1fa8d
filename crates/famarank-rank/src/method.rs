//! Core trait definition for cross-sectional rank methods.

use famarank_traits::RankDirection;

use crate::{PercentileConfig, PercentileRank, SignSplitRank};

/// Ranks one cross-section of raw values onto [0, 1].
///
/// The output has the same length as the input. Missing and non-finite
/// inputs are excluded from the population and keep a missing rank.
pub trait RankMethod: Send + Sync {
    /// Ranks the values of a single date.
    fn rank(&self, values: &[Option<f64>]) -> Vec<Option<f64>>;

    /// Returns the name of this method.
    fn name(&self) -> &str;
}

/// Builds the rank method for a factor direction.
#[must_use]
pub fn method_for(direction: RankDirection) -> Box<dyn RankMethod> {
    match direction {
        RankDirection::Ascending => Box::new(PercentileRank::default()),
        RankDirection::Descending => {
            Box::new(PercentileRank::new(PercentileConfig { descending: true }))
        }
        RankDirection::SignSplit => Box::new(SignSplitRank),
    }
}

/// Finite values with their positions.
pub(crate) fn population(values: &[Option<f64>]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i, x)))
        .collect()
}

/// Ranks a population with fewer than two distinct values at 0.0.
///
/// Returns `None` when the population is not degenerate.
pub(crate) fn degenerate(len: usize, population: &[(usize, f64)]) -> Option<Vec<Option<f64>>> {
    let first = population.first().map(|(_, v)| *v);
    let distinct = population.iter().any(|(_, v)| Some(*v) != first);
    if distinct {
        return None;
    }
    let mut out = vec![None; len];
    for (i, _) in population {
        out[*i] = Some(0.0);
    }
    Some(out)
}
