//! Layoff Insights
//!
//! Cleans raw tech-layoff records and derives per-company and per-location
//! metrics from them, using Polars frames throughout.
//!
//! - `cleaning/`: per-field normalization and the [`clean_layoffs`] pipeline
//! - `metrics/`: efficiency, instability, severity and fragility tables
//! - `filter`, `trends`: dashboard-style slicing and aggregation
//! - `data`, `config`: file I/O and pipeline settings
//!
//! ```no_run
//! use layoff_insights::{clean_layoffs, data, MetricsEngine};
//! use std::path::Path;
//!
//! let raw = data::load_raw_csv(Path::new("layoffs.csv"))?;
//! let cleaned = clean_layoffs(&raw)?;
//! let tables = MetricsEngine::new(&cleaned).compute_all_parallel()?;
//! println!("{} companies scored", tables.severity.rows.len());
//! # Ok::<(), layoff_insights::LayoffError>(())
//! ```

pub mod cleaning;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod schema;
pub mod trends;
pub mod utils;

// Re-export commonly used types
pub use cleaning::{clean_layoffs, clean_layoffs_with_report, CleaningReport, Quarter, SizeCategory};
pub use config::PipelineConfig;
pub use error::{LayoffError, Result};
pub use filter::LayoffFilter;
pub use metrics::*;
pub use trends::{CompanyProfile, DatasetSummary, Dimension, PeriodChanges};
