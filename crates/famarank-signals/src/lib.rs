#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod calculator;
pub mod fundamentals;
pub mod momentum;
pub mod quality;
pub mod registry;
pub mod risk;
pub mod size;
pub mod value;

// Re-export key types
pub use calculator::FactorCalculator;
pub use fundamentals::RollingAggregator;
pub use registry::{
    FactorCategory, FactorInfo, available_factors, create_factor, default_factors, factor_for,
    factors_by_category, get_factor_info,
};
