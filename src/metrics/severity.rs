//! Layoff severity: share of workforce cut, weighted by log headcount
//!
//!   layoff_severity_index = pct * ln(total + 1)
//!
//! The `+ 1` keeps a zero-person layoff at index 0 instead of `ln(0)`.
//! Records need both pct and total; per company the index is averaged.

use crate::error::Result;
use crate::schema::{COMPANY, PERCENTAGE_LAID_OFF, TOTAL_LAID_OFF};
use crate::utils::{company_key, descending_by_score, f64_values, i64_values, text_values, MeanAccumulator};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

const CONTEXT: &str = "Severity";

/// Severity index of a single record, `None` when an input is missing
pub fn severity_index(total_laid_off: Option<i64>, pct_laid_off: Option<f64>) -> Option<f64> {
    let total = total_laid_off? as f64;
    let pct = pct_laid_off?;
    let index = pct * (total + 1.0).ln();
    index.is_finite().then_some(index)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityRow {
    pub company: String,
    /// Mean over the company's qualifying records
    pub layoff_severity_index: f64,
    pub records: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SeverityResult {
    pub rows: Vec<SeverityRow>,
}

/// Calculate the severity table from a cleaned frame
pub fn calculate_severity(cleaned: &DataFrame) -> Result<SeverityResult> {
    let companies = text_values(cleaned, COMPANY, CONTEXT)?;
    let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;
    let pcts = f64_values(cleaned, PERCENTAGE_LAID_OFF, CONTEXT)?;

    let mut by_company: FxHashMap<&str, MeanAccumulator> = FxHashMap::default();
    for idx in 0..cleaned.height() {
        let Some(company) = company_key(companies[idx].as_deref()) else {
            continue;
        };
        if let Some(index) = severity_index(totals[idx], pcts[idx]) {
            by_company.entry(company).or_default().push(index);
        }
    }

    let mut rows: Vec<SeverityRow> = by_company
        .into_iter()
        .filter_map(|(company, acc)| {
            Some(SeverityRow {
                company: company.to_string(),
                layoff_severity_index: acc.mean()?,
                records: acc.count(),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        descending_by_score(
            a.layoff_severity_index,
            &a.company,
            b.layoff_severity_index,
            &b.company,
        )
    });

    tracing::debug!("{}: {} companies scored", CONTEXT, rows.len());

    Ok(SeverityResult { rows })
}

impl SeverityResult {
    pub fn index_for(&self, company: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.company == company)
            .map(|row| row.layoff_severity_index)
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new(
                COMPANY.into(),
                self.rows.iter().map(|r| r.company.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "layoff_severity_index".into(),
                self.rows.iter().map(|r| r.layoff_severity_index).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }
}
