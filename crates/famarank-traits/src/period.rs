//! Holding periods and quartile buckets used by the portfolio engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::FamaError;

/// Horizon over which monthly returns are compounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HoldingPeriod {
    /// 3 monthly observations.
    #[serde(rename = "quarterly")]
    Quarterly,
    /// 12 monthly observations.
    #[serde(rename = "yearly")]
    Yearly,
    /// 24 monthly observations.
    #[serde(rename = "2_years")]
    TwoYears,
    /// 36 monthly observations.
    #[serde(rename = "3_years")]
    ThreeYears,
    /// 60 monthly observations.
    #[serde(rename = "5_years")]
    FiveYears,
}

impl HoldingPeriod {
    /// Every supported holding period, shortest first.
    pub const ALL: [Self; 5] = [
        Self::Quarterly,
        Self::Yearly,
        Self::TwoYears,
        Self::ThreeYears,
        Self::FiveYears,
    ];

    /// Number of monthly returns compounded over the period.
    #[must_use]
    pub const fn months(&self) -> usize {
        match self {
            Self::Quarterly => 3,
            Self::Yearly => 12,
            Self::TwoYears => 24,
            Self::ThreeYears => 36,
            Self::FiveYears => 60,
        }
    }

    /// Label used in configuration and output tables.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::TwoYears => "2_years",
            Self::ThreeYears => "3_years",
            Self::FiveYears => "5_years",
        }
    }
}

impl fmt::Display for HoldingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HoldingPeriod {
    type Err = FamaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| FamaError::UnknownHoldingPeriod(s.to_string()))
    }
}

/// One of the four rank buckets, 1 holding the lowest ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quartile(u8);

impl Quartile {
    /// All four quartiles, lowest first.
    pub const ALL: [Self; 4] = [Self(1), Self(2), Self(3), Self(4)];

    /// Creates a quartile from its number, `None` outside 1..=4.
    #[must_use]
    pub const fn new(n: u8) -> Option<Self> {
        match n {
            1..=4 => Some(Self(n)),
            _ => None,
        }
    }

    /// Bins a rank in [0, 1] with edges 0, 0.25, 0.5, 0.75, 1.
    ///
    /// Bins are closed on the right and 0.0 falls into the first bin, so
    /// 0.25 maps to quartile 1 and 0.26 to quartile 2. Ranks outside [0, 1]
    /// or non-finite ranks have no quartile.
    ///
    /// Do not move 0.25 into quartile 2: a table listing 0.25 → 2 next to
    /// 0.5 → 2 and 0.76 → 4 fits no single set of edges. These are the
    /// right-closed edges of `pandas.cut`.
    #[must_use]
    pub fn from_rank(rank: f64) -> Option<Self> {
        if !rank.is_finite() || !(0.0..=1.0).contains(&rank) {
            return None;
        }
        let bucket = (rank * 4.0).ceil().max(1.0) as u8;
        Self::new(bucket)
    }

    /// Quartile number in 1..=4.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
