//! Statistical helpers shared by the factor, ranking and evaluation crates.
//!
//! Every helper treats missing inputs explicitly: slices of `f64` are assumed
//! to be already filtered, while the `Option` helpers propagate `None`.

use ndarray::Array1;

/// Arithmetic mean, `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use famarank_traits::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N-1 denominator).
///
/// Returns `None` for fewer than two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(Array1::from(values.to_vec()).std(1.0))
}

/// Median of the values, averaging the two middle values for even lengths.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Filters out non-finite values.
#[must_use]
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Division that yields `None` for a missing or zero denominator.
///
/// A non-finite quotient is reported as missing as well.
#[must_use]
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 {
        return None;
    }
    finite(Some(n / d))
}

/// Multiplication that propagates missing operands.
#[must_use]
pub fn product(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(Some(a? * b?))
}

/// Compounds simple returns: the product of `1 + r` minus one.
///
/// Any missing return makes the result missing.
///
/// # Examples
///
/// ```
/// use famarank_traits::stats::compound;
///
/// let r = compound(&[Some(0.1), Some(0.1), Some(-0.1)]).unwrap();
/// assert!((r - 0.089).abs() < 1e-12);
/// assert_eq!(compound(&[Some(0.1), None]), None);
/// ```
#[must_use]
pub fn compound(returns: &[Option<f64>]) -> Option<f64> {
    returns
        .iter()
        .try_fold(1.0, |acc, r| r.map(|r| acc * (1.0 + r)))
        .map(|growth| growth - 1.0)
}
