//! Error types for the layoff pipeline
//!
//! Per-field parse failures never show up here: they degrade to null inside the
//! cleaning transforms. Only structural problems (a missing column, an unreadable
//! config) reach the caller.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoffError {
    /// A column the pipeline depends on is absent from the input frame
    #[error("{context}: missing required column '{column}'")]
    MissingColumn { column: String, context: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LayoffError {
    pub fn missing_column(column: &str, context: &str) -> Self {
        LayoffError::MissingColumn {
            column: column.to_string(),
            context: context.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message() {
        let err = LayoffError::missing_column("date", "Cleaner");
        assert_eq!(err.to_string(), "Cleaner: missing required column 'date'");
    }
}
