#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/famarank/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The version of the famarank-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod factor;
pub mod period;
pub mod rows;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{FamaError, Result};
pub use factor::{Factor, FactorKind, RankDirection};
pub use period::{HoldingPeriod, Quartile};
pub use rows::{
    FactorRanks, FactorRow, FactorValues, IndexRow, InstrumentSeries, MetricsRow, RankingRow,
    RankingTable, RollingFundamentals, RollingReport,
};
pub use store::TableStore;
pub use types::{Date, InstrumentId, LineItems, PriceObservation, ReportObservation, month_start};
