//! Error types for the CSV table store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required column is absent from a table file.
    #[error("Missing required column {column} in {}", path.display())]
    MissingColumn {
        /// File that was read.
        path: PathBuf,
        /// Column name.
        column: String,
    },

    /// A cell could not be interpreted.
    #[error("Invalid value in column {column} at row {row}: {message}")]
    InvalidValue {
        /// Column name.
        column: String,
        /// Zero-based data row.
        row: usize,
        /// What was wrong with the value.
        message: String,
    },

    /// A table file does not exist.
    #[error("Table file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Polars failed to parse or write a frame.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::MissingColumn {
            path: PathBuf::from("prices.csv"),
            column: "close".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required column close in prices.csv");

        let err = DataError::InvalidValue {
            column: "date".to_string(),
            row: 3,
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value in column date at row 3: bad");
    }
}
