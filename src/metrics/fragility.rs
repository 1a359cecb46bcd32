//! Location fragility: how many companies in a location cut, and how deep
//!
//! 1. Keep records with location, company and pct all present
//! 2. Mean pct per (location, company)
//! 3. Per location: distinct companies and the mean of those company means
//! 4. fragility_index = num_companies * avg_pct
//!
//! Cleaned frames carry `"Unknown"` for missing locations; those rows count
//! as a location of their own.

use crate::error::Result;
use crate::schema::{COMPANY, LOCATION, PERCENTAGE_LAID_OFF};
use crate::utils::{company_key, descending_by_score, f64_values, text_values, MeanAccumulator};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

const CONTEXT: &str = "Fragility";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragilityRow {
    pub location: String,
    pub num_companies: usize,
    pub avg_pct: f64,
    pub fragility_index: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FragilityResult {
    pub rows: Vec<FragilityRow>,
}

/// Calculate the fragility table from a cleaned frame
///
/// Records need a location, a company and a percentage. Company means are
/// taken first so a company with many rounds counts once per location.
pub fn calculate_fragility(cleaned: &DataFrame) -> Result<FragilityResult> {
    let locations = text_values(cleaned, LOCATION, CONTEXT)?;
    let companies = text_values(cleaned, COMPANY, CONTEXT)?;
    let pcts = f64_values(cleaned, PERCENTAGE_LAID_OFF, CONTEXT)?;

    // location -> company -> pct mean
    let mut nested: FxHashMap<&str, FxHashMap<&str, MeanAccumulator>> = FxHashMap::default();
    for idx in 0..cleaned.height() {
        let (Some(location), Some(company), Some(pct)) = (
            locations[idx].as_deref(),
            company_key(companies[idx].as_deref()),
            pcts[idx],
        ) else {
            continue;
        };

        nested
            .entry(location)
            .or_default()
            .entry(company)
            .or_default()
            .push(pct);
    }

    let mut rows: Vec<FragilityRow> = nested
        .into_iter()
        .filter_map(|(location, per_company)| {
            let mut location_acc = MeanAccumulator::default();
            for company_mean in per_company.values().filter_map(MeanAccumulator::mean) {
                location_acc.push(company_mean);
            }
            let avg_pct = location_acc.mean()?;
            let num_companies = per_company.len();
            Some(FragilityRow {
                location: location.to_string(),
                num_companies,
                avg_pct,
                fragility_index: num_companies as f64 * avg_pct,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        descending_by_score(a.fragility_index, &a.location, b.fragility_index, &b.location)
    });

    tracing::debug!("{}: {} locations scored", CONTEXT, rows.len());

    Ok(FragilityResult { rows })
}

impl FragilityResult {
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new(
                LOCATION.into(),
                self.rows.iter().map(|r| r.location.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "num_companies".into(),
                self.rows.iter().map(|r| r.num_companies as u64).collect::<Vec<_>>(),
            ),
            Column::new(
                "avg_pct".into(),
                self.rows.iter().map(|r| r.avg_pct).collect::<Vec<_>>(),
            ),
            Column::new(
                "fragility_index".into(),
                self.rows.iter().map(|r| r.fragility_index).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }
}
