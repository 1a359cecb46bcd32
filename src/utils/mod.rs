//! Utility modules shared by cleaning, metrics and trends
//!
//! - Frame helpers: column validation and typed value extraction
//! - Grouping: mean accumulation and deterministic table ordering

pub mod frame_helpers;
pub mod grouping;

// Re-export commonly used helpers
pub use frame_helpers::{
    company_key, f64_values, filter_rows, i64_values, require_columns, text_values,
};
pub use grouping::{descending_by_score, MeanAccumulator};
