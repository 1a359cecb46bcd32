//! Layoff efficiency: layoffs per million raised, per percentage point cut
//!
//! A capital-inefficiency proxy. Higher scores mean more people laid off per
//! dollar raised for each point of workforce cut.
//!
//! Qualifying records need `total_laid_off`, `percentage_laid_off` and
//! `funds_raised_clean` all present, with the percentage and funding strictly
//! positive. Everything else is skipped, never errored.
//!
//! Per record:
//!   layoffs_per_million     = total / (funds / 1,000,000)
//!   layoff_efficiency_score = layoffs_per_million / pct
//!
//! Per company: sums of total and funds, means of pct, layoffs_per_million
//! and the score. Ordered by mean score, descending.

use crate::error::Result;
use crate::schema::{COMPANY, FUNDS_RAISED_CLEAN, PERCENTAGE_LAID_OFF, TOTAL_LAID_OFF};
use crate::utils::{company_key, descending_by_score, f64_values, i64_values, text_values, MeanAccumulator};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

const CONTEXT: &str = "Efficiency";
const MILLION: f64 = 1_000_000.0;

/// Per-record efficiency values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordEfficiency {
    pub layoffs_per_million: f64,
    pub layoff_efficiency_score: f64,
}

/// Compute the per-record values, or `None` if the record does not qualify
pub fn record_efficiency(
    total_laid_off: Option<i64>,
    pct_laid_off: Option<f64>,
    funds_raised: Option<f64>,
) -> Option<RecordEfficiency> {
    let total = total_laid_off? as f64;
    let pct = pct_laid_off.filter(|&p| p > 0.0)?;
    let funds = funds_raised.filter(|&f| f > 0.0)?;

    let layoffs_per_million = total / (funds / MILLION);
    let layoff_efficiency_score = layoffs_per_million / pct;

    (layoffs_per_million.is_finite() && layoff_efficiency_score.is_finite()).then_some(
        RecordEfficiency {
            layoffs_per_million,
            layoff_efficiency_score,
        },
    )
}

/// One company's aggregated efficiency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRow {
    pub company: String,
    pub total_laid_off: i64,
    pub percentage_laid_off: f64,
    pub funds_raised_clean: f64,
    pub layoffs_per_million: f64,
    pub layoff_efficiency_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EfficiencyResult {
    /// Ordered by `layoff_efficiency_score` descending
    pub rows: Vec<EfficiencyRow>,
    /// Records that passed the qualification filter
    pub qualifying_records: usize,
}

#[derive(Default)]
struct CompanyAccumulator {
    total_laid_off: i64,
    funds_raised: f64,
    pct: MeanAccumulator,
    per_million: MeanAccumulator,
    score: MeanAccumulator,
}

/// Calculate the efficiency table from a cleaned frame
///
/// # Errors
/// `MissingColumn` if the frame lacks any of the four input columns.
pub fn calculate_efficiency(cleaned: &DataFrame) -> Result<EfficiencyResult> {
    let companies = text_values(cleaned, COMPANY, CONTEXT)?;
    let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;
    let pcts = f64_values(cleaned, PERCENTAGE_LAID_OFF, CONTEXT)?;
    let funds = f64_values(cleaned, FUNDS_RAISED_CLEAN, CONTEXT)?;

    let mut by_company: FxHashMap<String, CompanyAccumulator> = FxHashMap::default();
    let mut qualifying_records = 0;

    for idx in 0..cleaned.height() {
        let Some(company) = company_key(companies[idx].as_deref()) else {
            continue;
        };
        let Some(record) = record_efficiency(totals[idx], pcts[idx], funds[idx]) else {
            continue;
        };

        qualifying_records += 1;
        let acc = by_company.entry(company.to_string()).or_default();
        // Qualification guarantees all three are present
        acc.total_laid_off += totals[idx].unwrap_or(0);
        acc.funds_raised += funds[idx].unwrap_or(0.0);
        acc.pct.push(pcts[idx].unwrap_or(0.0));
        acc.per_million.push(record.layoffs_per_million);
        acc.score.push(record.layoff_efficiency_score);
    }

    let mut rows: Vec<EfficiencyRow> = by_company
        .into_iter()
        .map(|(company, acc)| EfficiencyRow {
            company,
            total_laid_off: acc.total_laid_off,
            percentage_laid_off: acc.pct.mean().unwrap_or(0.0),
            funds_raised_clean: acc.funds_raised,
            layoffs_per_million: acc.per_million.mean().unwrap_or(0.0),
            layoff_efficiency_score: acc.score.mean().unwrap_or(0.0),
        })
        .collect();

    rows.sort_by(|a, b| {
        descending_by_score(
            a.layoff_efficiency_score,
            &a.company,
            b.layoff_efficiency_score,
            &b.company,
        )
    });

    tracing::debug!(
        "{}: {} qualifying records across {} companies",
        CONTEXT,
        qualifying_records,
        rows.len()
    );

    Ok(EfficiencyResult {
        rows,
        qualifying_records,
    })
}

impl EfficiencyResult {
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new(
                COMPANY.into(),
                self.rows.iter().map(|r| r.company.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                TOTAL_LAID_OFF.into(),
                self.rows.iter().map(|r| r.total_laid_off).collect::<Vec<_>>(),
            ),
            Column::new(
                PERCENTAGE_LAID_OFF.into(),
                self.rows.iter().map(|r| r.percentage_laid_off).collect::<Vec<_>>(),
            ),
            Column::new(
                FUNDS_RAISED_CLEAN.into(),
                self.rows.iter().map(|r| r.funds_raised_clean).collect::<Vec<_>>(),
            ),
            Column::new(
                "layoffs_per_million".into(),
                self.rows.iter().map(|r| r.layoffs_per_million).collect::<Vec<_>>(),
            ),
            Column::new(
                "layoff_efficiency_score".into(),
                self.rows.iter().map(|r| r.layoff_efficiency_score).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cleaned_frame() -> DataFrame {
        df![
            "company" => &[Some("Acme"), Some("Acme"), Some("Globex"), Some("Globex"), Some("Initech"), None],
            "total_laid_off" => &[Some(100i64), Some(300), Some(50), None, Some(10), Some(99)],
            "percentage_laid_off" => &[Some(10.0), Some(30.0), Some(0.0), Some(20.0), Some(5.0), Some(10.0)],
            "funds_raised_clean" => &[Some(5_000_000.0), Some(10_000_000.0), Some(1_000_000.0), Some(2_000_000.0), Some(1_000_000.0), Some(1_000_000.0)],
        ]
        .unwrap()
    }

    #[test]
    fn test_record_efficiency_known_values() {
        let record = record_efficiency(Some(100), Some(10.0), Some(5_000_000.0)).unwrap();
        assert_relative_eq!(record.layoffs_per_million, 20.0);
        assert_relative_eq!(record.layoff_efficiency_score, 2.0);
    }

    #[test]
    fn test_record_efficiency_preconditions() {
        assert!(record_efficiency(None, Some(10.0), Some(1e6)).is_none());
        assert!(record_efficiency(Some(10), None, Some(1e6)).is_none());
        assert!(record_efficiency(Some(10), Some(10.0), None).is_none());
        assert!(record_efficiency(Some(10), Some(0.0), Some(1e6)).is_none());
        assert!(record_efficiency(Some(10), Some(-1.0), Some(1e6)).is_none());
        assert!(record_efficiency(Some(10), Some(10.0), Some(0.0)).is_none());
        // Zero layoffs still qualify
        assert!(record_efficiency(Some(0), Some(10.0), Some(1e6)).is_some());
    }

    #[test]
    fn test_company_aggregation() {
        let result = calculate_efficiency(&cleaned_frame()).unwrap();

        // Acme: both rows; Globex: pct 0 and missing total; Initech: one row; null company skipped
        assert_eq!(result.qualifying_records, 3);
        assert_eq!(result.rows.len(), 2);

        let acme = result.rows.iter().find(|r| r.company == "Acme").unwrap();
        assert_eq!(acme.total_laid_off, 400);
        assert_relative_eq!(acme.funds_raised_clean, 15_000_000.0);
        assert_relative_eq!(acme.percentage_laid_off, 20.0);
        // Records: 20 per million / 10 = 2.0; 30 per million / 30 = 1.0
        assert_relative_eq!(acme.layoffs_per_million, 25.0);
        assert_relative_eq!(acme.layoff_efficiency_score, 1.5);

        let initech = result.rows.iter().find(|r| r.company == "Initech").unwrap();
        assert_relative_eq!(initech.layoffs_per_million, 10.0);
        assert_relative_eq!(initech.layoff_efficiency_score, 2.0);
    }

    #[test]
    fn test_ordering_descending() {
        let result = calculate_efficiency(&cleaned_frame()).unwrap();
        let order: Vec<&str> = result.rows.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(order, vec!["Initech", "Acme"]);
    }

    #[test]
    fn test_no_qualifying_rows_is_empty() {
        let df = df![
            "company" => &["Acme"],
            "total_laid_off" => &[None::<i64>],
            "percentage_laid_off" => &[Some(10.0)],
            "funds_raised_clean" => &[Some(1e6)],
        ]
        .unwrap();

        let result = calculate_efficiency(&df).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.to_frame().unwrap().height(), 0);
    }

    #[test]
    fn test_to_frame_columns() {
        let frame = calculate_efficiency(&cleaned_frame()).unwrap().to_frame().unwrap();
        assert_eq!(frame.height(), 2);
        let names: Vec<&str> = frame.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "company",
                "total_laid_off",
                "percentage_laid_off",
                "funds_raised_clean",
                "layoffs_per_million",
                "layoff_efficiency_score",
            ]
        );
    }
}
