//! Table store abstraction.
//!
//! A store is opened once per run and handed to the pipeline. Reads return
//! typed rows; writes replace whatever output the store held before.

use crate::{IndexRow, MetricsRow, PriceObservation, RankingTable, ReportObservation};

/// Source of input tables and sink for output tables.
pub trait TableStore {
    /// Error type produced by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads the monthly price table.
    fn prices(&self) -> Result<Vec<PriceObservation>, Self::Error>;

    /// Loads the financial report table.
    fn reports(&self) -> Result<Vec<ReportObservation>, Self::Error>;

    /// Loads the ranking table written by a previous run.
    fn ranking(&self) -> Result<RankingTable, Self::Error>;

    /// Replaces the ranking table.
    fn replace_ranking(&self, table: &RankingTable) -> Result<(), Self::Error>;

    /// Replaces the portfolio metrics table.
    fn write_metrics(&self, rows: &[MetricsRow]) -> Result<(), Self::Error>;

    /// Replaces the benchmark index table.
    fn write_index(&self, rows: &[IndexRow]) -> Result<(), Self::Error>;
}
