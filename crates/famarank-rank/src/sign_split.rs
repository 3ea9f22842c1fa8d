//! Sign-aware ranking for yield-like factors.

use crate::method::{RankMethod, degenerate, population};

/// Ranks positives ascending above non-positives ranked descending.
///
/// Non-positive values take ordinal ranks `1..=m` with the value closest to
/// zero first, so a more negative value ranks higher among them. Positive
/// values follow with ordinal ranks `m + 1..` in ascending order. Ties on
/// either side share the lowest ordinal of their group. The combined ordinal
/// rank is min-max normalised within the cross-section.
///
/// For `[-5, -1, 2, 10]` the ranks are `[1/3, 0, 2/3, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignSplitRank;

/// Assigns "min" ordinal ranks starting at `offset + 1` to a sorted side.
fn min_ranks(side: &[(usize, f64)], offset: usize, out: &mut [f64]) {
    let mut start = 0;
    while start < side.len() {
        let mut end = start + 1;
        while end < side.len() && side[end].1 == side[start].1 {
            end += 1;
        }
        let rank = (offset + start + 1) as f64;
        for (i, _) in &side[start..end] {
            out[*i] = rank;
        }
        start = end;
    }
}

impl RankMethod for SignSplitRank {
    fn rank(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let pop = population(values);
        if let Some(out) = degenerate(values.len(), &pop) {
            return out;
        }

        let (mut positive, mut non_positive): (Vec<_>, Vec<_>) =
            pop.iter().copied().partition(|(_, v)| *v > 0.0);
        non_positive.sort_by(|a, b| b.1.total_cmp(&a.1));
        positive.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut ordinal = vec![0.0; values.len()];
        min_ranks(&non_positive, 0, &mut ordinal);
        min_ranks(&positive, non_positive.len(), &mut ordinal);

        let ranked = || pop.iter().map(|(i, _)| ordinal[*i]);
        let min = ranked().fold(f64::INFINITY, f64::min);
        let max = ranked().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        let mut out = vec![None; values.len()];
        for (i, _) in &pop {
            out[*i] = Some(if span > 0.0 {
                (ordinal[*i] - min) / span
            } else {
                0.0
            });
        }
        out
    }

    fn name(&self) -> &str {
        "sign_split"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn rank(values: &[f64]) -> Vec<f64> {
        let input: Vec<_> = values.iter().map(|v| Some(*v)).collect();
        SignSplitRank.rank(&input).into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_mixed_signs() {
        let out = rank(&[-5.0, -1.0, 2.0, 10.0]);
        assert_relative_eq!(out[0], 1.0 / 3.0);
        assert_relative_eq!(out[1], 0.0);
        assert_relative_eq!(out[2], 2.0 / 3.0);
        assert_relative_eq!(out[3], 1.0);
    }

    #[test]
    fn test_zero_counts_as_non_positive() {
        let out = rank(&[0.0, -2.0, 3.0]);
        assert_relative_eq!(out[0], 0.0);
        assert_relative_eq!(out[1], 0.5);
        assert_relative_eq!(out[2], 1.0);
    }

    #[rstest]
    #[case(&[1.0, 2.0, 2.0, 4.0], &[0.0, 1.0 / 3.0, 1.0 / 3.0, 1.0])]
    #[case(&[-1.0, -3.0, -3.0], &[0.0, 1.0, 1.0])]
    fn test_min_ties(#[case] values: &[f64], #[case] expected: &[f64]) {
        let out = rank(values);
        for (got, want) in out.iter().zip(expected) {
            assert_relative_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_and_missing() {
        assert_eq!(SignSplitRank.rank(&[Some(-1.0)]), vec![Some(0.0)]);
        assert_eq!(
            SignSplitRank.rank(&[Some(2.0), None, Some(2.0)]),
            vec![Some(0.0), None, Some(0.0)]
        );
        assert_eq!(
            SignSplitRank.rank(&[Some(1.0), Some(f64::NEG_INFINITY), Some(-1.0)]),
            vec![Some(1.0), None, Some(0.0)]
        );
    }
}
