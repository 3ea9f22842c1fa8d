//! Value factors comparing fundamentals to price.

mod earnings_yield;

pub use earnings_yield::{OperatingEarningsYield, operating_earnings_per_share};
