#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famarank/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Version information for the famarank crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod error;
mod pipeline;

pub use config::{DATA_DIR_ENV, OUTPUT_DIR_ENV, PipelineConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, RunOutput};

// ============================================================================
// Sub-crates
// ============================================================================

/// Row types, the [`Factor`] and [`TableStore`] traits and statistics helpers.
pub mod traits {
    pub use famarank_traits::*;
}

/// Rolling fundamentals, factor definitions and the factor calculator.
///
/// ## Factors
///
/// - **size**: close × shares outstanding
/// - **value**: trailing operating income per share over close
/// - **profitability**: trailing operating income over trailing gross income
/// - **momentum**: 12-month percentage change in close
/// - **volatility**: 12-month sample standard deviation of close
pub mod signals {
    pub use famarank_signals::*;
}

/// Cross-sectional ranking.
pub mod rank {
    pub use famarank_rank::*;
}

/// Quartile portfolios, metrics and the backtest grid.
///
/// Quartiles are formed on a within-date percentile re-rank with right-closed
/// bins:
///
/// ```text
/// (0, 0.25] -> 1   (0.25, 0.5] -> 2   (0.5, 0.75] -> 3   (0.75, 1] -> 4
/// ```
///
/// A rank of exactly 0.0 falls into quartile 1.
pub mod eval {
    pub use famarank_eval::*;
}

/// CSV table store, resampling and backups.
pub mod data {
    pub use famarank_data::*;
}

// Re-export core traits and types at top level for convenience
pub use famarank_traits::{
    Factor, FactorKind, FamaError, HoldingPeriod, Quartile, RankDirection, RankingTable,
    TableStore,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use famarank::prelude::*;
/// ```
pub mod prelude {
    pub use crate::traits::*;
    pub use crate::{Pipeline, PipelineConfig, PipelineError};
    pub use famarank_data::CsvStore;
    pub use famarank_eval::{BacktestConfig, BacktestReport};
}
