//! Pipeline error type.

use std::path::PathBuf;

use famarank_traits::FamaError;
use thiserror::Error;

/// Errors raised while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The table store failed to read or write a table.
    #[error("Storage error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A computation stage rejected its input.
    #[error(transparent)]
    Compute(#[from] FamaError),

    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigIo {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::PipelineConfig`].
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl PipelineError {
    /// Wraps a table store error.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
