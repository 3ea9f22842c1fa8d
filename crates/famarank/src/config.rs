//! Pipeline configuration.
//!
//! Values are layered: defaults, then an optional JSON file, then the
//! `FAMARANK_DATA_DIR` and `FAMARANK_OUTPUT_DIR` environment variables. The
//! CLI applies its own flags last.

use std::{
    env,
    path::{Path, PathBuf},
};

use famarank_data::CsvStore;
use famarank_eval::BacktestConfig;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Environment variable overriding [`PipelineConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "FAMARANK_DATA_DIR";

/// Environment variable overriding [`PipelineConfig::output_dir`].
pub const OUTPUT_DIR_ENV: &str = "FAMARANK_OUTPUT_DIR";

/// Configuration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the input price and report tables
    pub data_dir: PathBuf,
    /// Directory receiving the ranking, metrics and index tables
    pub output_dir: PathBuf,
    /// Copy output files to versioned backups before replacing them
    pub backup: bool,
    /// Rank columns and holding periods to backtest
    #[serde(flatten)]
    pub backtest: BacktestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            backup: false,
            backtest: BacktestConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file; absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Applies directory overrides from the environment.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var(OUTPUT_DIR_ENV) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }

    /// Defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Fails if `path` cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Opens the CSV store described by this configuration.
    #[must_use]
    pub fn store(&self) -> CsvStore {
        CsvStore::new(&self.data_dir, &self.output_dir).with_backup(self.backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.backtest.rank_columns.len(), 5);
        assert_eq!(config.backtest.holding_periods.len(), 5);
        assert!(!config.backup);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("famarank.json");
        std::fs::write(
            &path,
            r#"{"output_dir": "results", "holding_periods": ["quarterly"], "backup": true}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.backtest.holding_periods, vec!["quarterly"]);
        assert_eq!(config.backtest.rank_columns.len(), 5);
        assert!(config.backup);
    }

    #[test]
    fn test_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("famarank.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            PipelineConfig::from_file(&path),
            Err(PipelineError::ConfigParse(_))
        ));
        assert!(matches!(
            PipelineConfig::from_file(&dir.path().join("missing.json")),
            Err(PipelineError::ConfigIo { .. })
        ));
    }
}
