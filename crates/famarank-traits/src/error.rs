//! Error types shared by the famarank computation crates.

use thiserror::Error;

/// The main error type for factor ranking and backtesting.
#[derive(Debug, Error)]
pub enum FamaError {
    /// A required column is absent from an input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A rank column name that does not correspond to any factor.
    #[error("Unknown rank column: {0}")]
    UnknownRankColumn(String),

    /// A factor name that is not registered.
    #[error("Unknown factor: {0}")]
    UnknownFactor(String),

    /// A holding-period label outside the supported set.
    #[error("Unknown holding period: {0}")]
    UnknownHoldingPeriod(String),

    /// Malformed or inconsistent input rows.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A date that cannot be parsed or is out of range.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Not enough rows to produce any output at all.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl FamaError {
    /// Whether this error rejects a request rather than reporting bad data.
    ///
    /// Validation errors abort a single backtest unit; the caller carries on
    /// with the remaining units.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_)
                | Self::UnknownRankColumn(_)
                | Self::UnknownFactor(_)
                | Self::UnknownHoldingPeriod(_)
        )
    }
}

impl From<String> for FamaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for FamaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for famarank operations.
pub type Result<T> = std::result::Result<T, FamaError>;
