//! Factor trait and the closed set of factor kinds.
//!
//! A factor turns the per-instrument time series assembled by the calculator
//! into one raw value per observation. Raw values are later converted to
//! cross-sectional percentile ranks, in the direction the factor declares.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{FamaError, InstrumentSeries};

/// The five factors ranked by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Market capitalisation.
    Size,
    /// Operating earnings yield.
    Value,
    /// Operating income over gross income.
    Profitability,
    /// Twelve-observation price change.
    Momentum,
    /// Twelve-observation standard deviation of close.
    Volatility,
}

impl FactorKind {
    /// Every factor, in output column order.
    pub const ALL: [Self; 5] = [
        Self::Size,
        Self::Value,
        Self::Profitability,
        Self::Momentum,
        Self::Volatility,
    ];

    /// Short name of the factor.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Value => "value",
            Self::Profitability => "profitability",
            Self::Momentum => "momentum",
            Self::Volatility => "volatility",
        }
    }

    /// Name of the rank column in the ranking table.
    #[must_use]
    pub const fn rank_column(&self) -> &'static str {
        match self {
            Self::Size => "size_rank",
            Self::Value => "value_rank",
            Self::Profitability => "profitability_rank",
            Self::Momentum => "momentum_rank",
            Self::Volatility => "volatility_rank",
        }
    }

    /// Resolves a rank column name such as `value_rank`.
    #[must_use]
    pub fn from_rank_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.rank_column() == column)
    }

    /// Resolves a rank column against the columns a table carries.
    ///
    /// # Errors
    ///
    /// [`FamaError::UnknownRankColumn`] if the name matches no factor and
    /// [`FamaError::MissingColumn`] if `available` does not include it.
    pub fn resolve(column: &str, available: &[Self]) -> Result<Self, FamaError> {
        let kind = Self::from_rank_column(column)
            .ok_or_else(|| FamaError::UnknownRankColumn(column.to_string()))?;
        if !available.contains(&kind) {
            return Err(FamaError::MissingColumn(column.to_string()));
        }
        Ok(kind)
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FactorKind {
    type Err = FamaError;

    /// Accepts either the short name (`size`) or the rank column (`size_rank`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .or_else(|| Self::from_rank_column(s))
            .ok_or_else(|| FamaError::UnknownRankColumn(s.to_string()))
    }
}

/// How raw factor values map onto the [0, 1] rank scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDirection {
    /// Largest raw value ranks highest.
    Ascending,
    /// Smallest raw value ranks highest.
    Descending,
    /// Positives ascending above non-positives ranked descending.
    SignSplit,
}

/// A factor computed from an instrument's monthly series.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait Factor: Send + Sync {
    /// Unique name of the factor.
    fn name(&self) -> &str;

    /// The factor kind this implementation produces.
    fn kind(&self) -> FactorKind;

    /// Rank direction used by the cross-sectional ranker.
    fn direction(&self) -> RankDirection;

    /// Number of monthly observations needed before the first value.
    ///
    /// Zero for factors computed from a single observation.
    fn lookback(&self) -> usize;

    /// Input table columns this factor reads.
    fn required_columns(&self) -> &[&str];

    /// Computes one raw value per observation of `series`.
    ///
    /// The returned vector has the same length as the series. Observations
    /// without enough history, or with a missing or zero denominator, yield
    /// `None`.
    fn compute(&self, series: &InstrumentSeries) -> Vec<Option<f64>>;
}
