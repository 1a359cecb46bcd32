//! Post-cleaning summary: size estimate statistics, size category counts and
//! how many key fields ended up null.

use super::SizeCategory;
use crate::error::Result;
use crate::schema::*;
use crate::utils::{i64_values, require_columns, text_values};
use polars::prelude::*;
use serde::Serialize;

const CONTEXT: &str = "CleaningReport";

/// Descriptive statistics over the non-null size estimates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeStats {
    pub count: usize,
    pub mean: f64,
    pub min: i64,
    pub max: i64,
}

impl SizeStats {
    fn from_values(values: &[i64]) -> Option<Self> {
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        let sum: f64 = values.iter().map(|&v| v as f64).sum();
        Some(SizeStats {
            count: values.len(),
            mean: sum / values.len() as f64,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub rows: usize,
    /// `None` when no row has an estimate
    pub size_stats: Option<SizeStats>,
    /// Every category, in display order, including zero counts
    pub category_counts: Vec<(SizeCategory, usize)>,
    pub null_dates: usize,
    pub null_percentages: usize,
    pub null_funding: usize,
}

impl CleaningReport {
    /// Summarize a frame produced by [`super::clean_layoffs`]
    pub fn from_cleaned(cleaned: &DataFrame) -> Result<Self> {
        let sizes: Vec<i64> = i64_values(cleaned, ESTIMATED_COMPANY_SIZE, CONTEXT)?
            .into_iter()
            .flatten()
            .collect();

        let labels = text_values(cleaned, COMPANY_SIZE_CATEGORY, CONTEXT)?;
        let category_counts = SizeCategory::ALL
            .into_iter()
            .map(|category| {
                let count = labels
                    .iter()
                    .filter(|label| label.as_deref() == Some(category.label()))
                    .count();
                (category, count)
            })
            .collect();

        let null_count = |name: &str| -> Result<usize> {
            require_columns(cleaned, &[name], CONTEXT)?;
            Ok(cleaned.column(name)?.null_count())
        };

        Ok(CleaningReport {
            rows: cleaned.height(),
            size_stats: SizeStats::from_values(&sizes),
            category_counts,
            null_dates: null_count(DATE)?,
            null_percentages: null_count(PERCENTAGE_LAID_OFF)?,
            null_funding: null_count(FUNDS_RAISED_CLEAN)?,
        })
    }

    pub fn count_for(&self, category: SizeCategory) -> usize {
        self.category_counts
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, count)| *count)
    }
}
