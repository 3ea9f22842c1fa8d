#![doc = include_str!("../README.md")]

mod backup;
mod error;
mod frame;
mod resample;
mod store;

pub use backup::{backup_file, backup_path};
pub use error::DataError;
pub use resample::resample_monthly;
pub use store::{CsvStore, files};

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
