//! Pipeline configuration
//!
//! Defaults, overlaid by an optional JSON file, overlaid by environment
//! variables:
//!
//! | Variable              | Field          |
//! |-----------------------|----------------|
//! | `LAYOFFS_INPUT`       | `input_path`   |
//! | `LAYOFFS_OUTPUT`      | `output_path`  |
//! | `LAYOFFS_METRICS_DIR` | `metrics_dir`  |
//! | `LAYOFFS_TOP_N`       | `top_n`        |

use crate::error::{LayoffError, Result};
use crate::filter::LayoffFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw layoffs CSV
    pub input_path: PathBuf,
    /// Cleaned output; `.parquet` writes Parquet, anything else CSV
    pub output_path: PathBuf,
    /// Directory receiving one CSV per metric table
    pub metrics_dir: PathBuf,
    /// Rows of each metric table to log
    pub top_n: usize,
    /// `tracing_subscriber` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Restrict metric computation to a subset of records
    pub filter: LayoffFilter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("layoffs.csv"),
            output_path: PathBuf::from("Cleaned_layoffs.csv"),
            metrics_dir: PathBuf::from("metrics"),
            top_n: 10,
            log_filter: "layoff_insights=info,warn".to_string(),
            filter: LayoffFilter::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; fields absent from the file keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LayoffError::Config(format!("failed to read config file {:?}: {}", path, e))
        })?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LAYOFFS_*` overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = lookup("LAYOFFS_INPUT") {
            self.input_path = PathBuf::from(input);
        }
        if let Some(output) = lookup("LAYOFFS_OUTPUT") {
            self.output_path = PathBuf::from(output);
        }
        if let Some(dir) = lookup("LAYOFFS_METRICS_DIR") {
            self.metrics_dir = PathBuf::from(dir);
        }
        if let Some(top_n) = lookup("LAYOFFS_TOP_N") {
            self.top_n = top_n.trim().parse().map_err(|_| {
                LayoffError::Config(format!("LAYOFFS_TOP_N must be a positive integer, got '{}'", top_n))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("input_path", &self.input_path),
            ("output_path", &self.output_path),
            ("metrics_dir", &self.metrics_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(LayoffError::Config(format!("{} must not be empty", name)));
            }
        }
        if self.top_n == 0 {
            return Err(LayoffError::Config("top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}
