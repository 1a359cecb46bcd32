//! Layoff instability: in how many distinct quarters did a company lay off?
//!
//! Quarters are re-derived from `date` rather than read from the stored
//! `quarter` column, so the score stays consistent with the dates even if
//! the derived column was altered or is absent. Records with no company or
//! no parseable date are ignored.

use crate::cleaning::{parse_date, Quarter};
use crate::error::Result;
use crate::schema::{COMPANY, DATE};
use crate::utils::{company_key, text_values};
use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

const CONTEXT: &str = "Instability";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstabilityRow {
    pub company: String,
    pub layoff_instability_score: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InstabilityResult {
    /// Ordered by score descending, ties by company name
    pub rows: Vec<InstabilityRow>,
}

/// Calculate the instability table from a cleaned frame
pub fn calculate_instability(cleaned: &DataFrame) -> Result<InstabilityResult> {
    let companies = text_values(cleaned, COMPANY, CONTEXT)?;
    let dates = text_values(cleaned, DATE, CONTEXT)?;

    // Dedup (company, quarter) pairs first, then count per company
    let pairs: FxHashSet<(&str, Quarter)> = companies
        .iter()
        .zip(&dates)
        .filter_map(|(company, date)| {
            let company = company_key(company.as_deref())?;
            let quarter = Quarter::from_date(parse_date(date.as_deref())?);
            Some((company, quarter))
        })
        .collect();

    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for &(company, _) in &pairs {
        *counts.entry(company).or_insert(0) += 1;
    }

    let mut rows: Vec<InstabilityRow> = counts
        .into_iter()
        .map(|(company, score)| InstabilityRow {
            company: company.to_string(),
            layoff_instability_score: score,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.layoff_instability_score
            .cmp(&a.layoff_instability_score)
            .then_with(|| a.company.cmp(&b.company))
    });

    tracing::debug!("{}: {} companies with dated layoffs", CONTEXT, rows.len());

    Ok(InstabilityResult { rows })
}

impl InstabilityResult {
    pub fn score_for(&self, company: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|row| row.company == company)
            .map(|row| row.layoff_instability_score)
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new(
                COMPANY.into(),
                self.rows.iter().map(|r| r.company.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "layoff_instability_score".into(),
                self.rows
                    .iter()
                    .map(|r| r.layoff_instability_score as u64)
                    .collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_quarters_counted_once() {
        let df = df![
            "company" => &["Acme", "Acme", "Acme"],
            "date" => &["2023-01-15", "2023-02-20", "2023-04-01"],
        ]
        .unwrap();

        let result = calculate_instability(&df).unwrap();
        assert_eq!(result.score_for("Acme"), Some(2));
    }

    #[test]
    fn test_nulls_excluded_and_ordering() {
        let df = df![
            "company" => &[Some("Acme"), Some("Globex"), Some("Globex"), Some("Globex"), None, Some("Initech")],
            "date" => &[Some("2023-01-15"), Some("2022-01-01"), Some("2022-07-01"), Some("2023-01-01"), Some("2023-01-01"), None],
        ]
        .unwrap();

        let result = calculate_instability(&df).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].company, "Globex");
        assert_eq!(result.rows[0].layoff_instability_score, 3);
        assert_eq!(result.score_for("Acme"), Some(1));
        assert_eq!(result.score_for("Initech"), None);
    }

    #[test]
    fn test_same_quarter_different_years() {
        let df = df![
            "company" => &["Acme", "Acme"],
            "date" => &["2022-02-01", "2023-02-01"],
        ]
        .unwrap();

        assert_eq!(calculate_instability(&df).unwrap().score_for("Acme"), Some(2));
    }

    #[test]
    fn test_ignores_stored_quarter_column() {
        // A stale quarter column must not influence the count
        let df = df![
            "company" => &["Acme", "Acme"],
            "date" => &["2023-01-15", "2023-05-01"],
            "quarter" => &["2023Q1", "2023Q1"],
        ]
        .unwrap();

        assert_eq!(calculate_instability(&df).unwrap().score_for("Acme"), Some(2));
    }

    #[test]
    fn test_empty_input() {
        let df = df![
            "company" => &[None::<&str>],
            "date" => &[None::<&str>],
        ]
        .unwrap();

        let result = calculate_instability(&df).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.to_frame().unwrap().height(), 0);
    }

    #[test]
    fn test_to_frame_scores_are_u64() {
        let df = df![
            "company" => &["Acme", "Acme"],
            "date" => &["2023-01-15", "2023-05-01"],
        ]
        .unwrap();

        let frame = calculate_instability(&df).unwrap().to_frame().unwrap();
        let scores = frame.column("layoff_instability_score").unwrap();
        assert_eq!(scores.dtype(), &DataType::UInt64);
        assert_eq!(scores.u64().unwrap().get(0), Some(2));
    }
}
