//! Factor registry for discovering and constructing the available factors.

use famarank_traits::{Factor, FactorKind, FamaError, Result};
use serde::{Deserialize, Serialize};

use crate::{
    momentum::PriceMomentum, quality::Profitability, risk::PriceVolatility, size::MarketCap,
    value::OperatingEarningsYield,
};

/// Factor category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorCategory {
    /// Company size
    Size,
    /// Valuation factors
    Value,
    /// Profitability factors
    Quality,
    /// Price momentum factors
    Momentum,
    /// Price risk factors
    Risk,
}

impl FactorCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Size => "Market capitalisation",
            Self::Value => "Valuation metrics comparing fundamentals to price",
            Self::Quality => "Profitability and operational efficiency metrics",
            Self::Momentum => "Price trend over the past year",
            Self::Risk => "Dispersion of prices over the past year",
        }
    }
}

/// Metadata about a factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorInfo {
    /// Unique identifier for the factor
    pub name: &'static str,

    /// Factor kind
    pub kind: FactorKind,

    /// Category classification
    pub category: FactorCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Typical lookback in monthly observations
    pub typical_lookback: usize,

    /// Whether the factor requires fundamental data
    pub requires_fundamentals: bool,
}

/// Get information about all available factors, in rank column order.
#[must_use]
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            name: "size",
            kind: FactorKind::Size,
            category: FactorCategory::Size,
            description: "Close price times shares outstanding",
            typical_lookback: 0,
            requires_fundamentals: true,
        },
        FactorInfo {
            name: "value",
            kind: FactorKind::Value,
            category: FactorCategory::Value,
            description: "Trailing operating earnings per share over close, sign-split ranked",
            typical_lookback: 0,
            requires_fundamentals: true,
        },
        FactorInfo {
            name: "profitability",
            kind: FactorKind::Profitability,
            category: FactorCategory::Quality,
            description: "Trailing operating income over trailing gross income",
            typical_lookback: 0,
            requires_fundamentals: true,
        },
        FactorInfo {
            name: "momentum",
            kind: FactorKind::Momentum,
            category: FactorCategory::Momentum,
            description: "12-month percentage change in close",
            typical_lookback: 12,
            requires_fundamentals: false,
        },
        FactorInfo {
            name: "volatility",
            kind: FactorKind::Volatility,
            category: FactorCategory::Risk,
            description: "12-month sample standard deviation of close, low ranks high",
            typical_lookback: 12,
            requires_fundamentals: false,
        },
    ]
}

/// Get all factors in a specific category.
#[must_use]
pub fn factors_by_category(category: &FactorCategory) -> Vec<FactorInfo> {
    available_factors()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific factor by name.
#[must_use]
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    available_factors()
        .into_iter()
        .find(|info| info.name == name)
}

/// Constructs a factor with its default configuration.
#[must_use]
pub fn factor_for(kind: FactorKind) -> Box<dyn Factor> {
    match kind {
        FactorKind::Size => Box::new(MarketCap),
        FactorKind::Value => Box::new(OperatingEarningsYield),
        FactorKind::Profitability => Box::new(Profitability),
        FactorKind::Momentum => Box::new(PriceMomentum::default()),
        FactorKind::Volatility => Box::new(PriceVolatility::default()),
    }
}

/// Constructs a factor by name.
///
/// # Errors
///
/// [`FamaError::UnknownFactor`] if no factor has that name.
pub fn create_factor(name: &str) -> Result<Box<dyn Factor>> {
    get_factor_info(name)
        .map(|info| factor_for(info.kind))
        .ok_or_else(|| FamaError::UnknownFactor(name.to_string()))
}

/// Every factor with its default configuration, in rank column order.
#[must_use]
pub fn default_factors() -> Vec<Box<dyn Factor>> {
    FactorKind::ALL.into_iter().map(factor_for).collect()
}
