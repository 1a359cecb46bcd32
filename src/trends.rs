//! Trend aggregations over a cleaned frame
//!
//! The numbers behind the dashboard's trend and company pages: totals per
//! period and per category, overall KPIs and single-company profiles.
//! Missing headcounts contribute nothing to sums but the record still counts
//! toward distinct-company tallies.

use crate::cleaning::{parse_date, Quarter, SizeCategory};
use crate::error::Result;
use crate::schema::*;
use crate::utils::{company_key, filter_rows, i64_values, text_values};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const CONTEXT: &str = "Trends";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterTotal {
    pub quarter: String,
    pub total_laid_off: i64,
    pub companies: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub total_laid_off: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionTotal {
    pub key: String,
    pub total_laid_off: i64,
}

/// Categorical columns that totals can be broken down by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Industry,
    Country,
    Stage,
    SizeCategory,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Industry => INDUSTRY,
            Dimension::Country => COUNTRY,
            Dimension::Stage => STAGE,
            Dimension::SizeCategory => COMPANY_SIZE_CATEGORY,
        }
    }
}

/// Event quarter per row, re-derived from `date`
fn row_quarters(cleaned: &DataFrame) -> Result<Vec<Option<Quarter>>> {
    Ok(text_values(cleaned, DATE, CONTEXT)?
        .iter()
        .map(|d| parse_date(d.as_deref()).map(Quarter::from_date))
        .collect())
}

/// Layoffs and distinct companies per quarter, chronological
pub fn totals_by_quarter(cleaned: &DataFrame) -> Result<Vec<QuarterTotal>> {
    let quarters = row_quarters(cleaned)?;
    let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;
    let companies = text_values(cleaned, COMPANY, CONTEXT)?;

    let mut by_quarter: BTreeMap<Quarter, (i64, FxHashSet<&str>)> = BTreeMap::new();
    for idx in 0..cleaned.height() {
        let Some(quarter) = quarters[idx] else {
            continue;
        };
        let entry = by_quarter.entry(quarter).or_default();
        entry.0 += totals[idx].unwrap_or(0);
        if let Some(company) = company_key(companies[idx].as_deref()) {
            entry.1.insert(company);
        }
    }

    Ok(by_quarter
        .into_iter()
        .map(|(quarter, (total, companies))| QuarterTotal {
            quarter: quarter.to_string(),
            total_laid_off: total,
            companies: companies.len(),
        })
        .collect())
}

/// Layoffs per event year, ascending
pub fn totals_by_year(cleaned: &DataFrame) -> Result<Vec<YearTotal>> {
    let quarters = row_quarters(cleaned)?;
    let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;

    let mut by_year: BTreeMap<i32, i64> = BTreeMap::new();
    for (quarter, total) in quarters.iter().zip(&totals) {
        if let Some(quarter) = quarter {
            *by_year.entry(quarter.year).or_insert(0) += total.unwrap_or(0);
        }
    }

    Ok(by_year
        .into_iter()
        .map(|(year, total_laid_off)| YearTotal {
            year,
            total_laid_off,
        })
        .collect())
}

/// Layoffs per category value, largest first; null keys are skipped
pub fn totals_by_dimension(cleaned: &DataFrame, dimension: Dimension) -> Result<Vec<DimensionTotal>> {
    totals_by_column(cleaned, dimension.column())
}

fn totals_by_column(cleaned: &DataFrame, column: &str) -> Result<Vec<DimensionTotal>> {
    let keys = text_values(cleaned, column, CONTEXT)?;
    let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;

    let mut by_key: FxHashMap<&str, i64> = FxHashMap::default();
    for (key, total) in keys.iter().zip(&totals) {
        if let Some(key) = key.as_deref() {
            *by_key.entry(key).or_insert(0) += total.unwrap_or(0);
        }
    }

    let mut rows: Vec<DimensionTotal> = by_key
        .into_iter()
        .map(|(key, total_laid_off)| DimensionTotal {
            key: key.to_string(),
            total_laid_off,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_laid_off
            .cmp(&a.total_laid_off)
            .then_with(|| a.key.cmp(&b.key))
    });
    Ok(rows)
}

/// Percent change from `previous` to `current`
///
/// `None` when there is no previous period or it is zero.
pub fn pct_change(current: i64, previous: Option<i64>) -> Option<f64> {
    let previous = previous.filter(|&p| p != 0)? as f64;
    Some((current as f64 - previous) / previous * 100.0)
}

/// Change of the latest quarter and year over the period before it
///
/// "Before it" is the previous period present in the data, not necessarily
/// the adjacent calendar period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodChanges {
    pub latest_quarter: Option<String>,
    pub quarter_over_quarter: Option<f64>,
    pub latest_year: Option<i32>,
    pub year_over_year: Option<f64>,
}

pub fn period_changes(cleaned: &DataFrame) -> Result<PeriodChanges> {
    let quarters = totals_by_quarter(cleaned)?;
    let years = totals_by_year(cleaned)?;

    let latest_pair = |totals: Vec<i64>| -> Option<f64> {
        let (&current, rest) = totals.split_last()?;
        pct_change(current, rest.last().copied())
    };

    Ok(PeriodChanges {
        latest_quarter: quarters.last().map(|q| q.quarter.clone()),
        quarter_over_quarter: latest_pair(quarters.iter().map(|q| q.total_laid_off).collect()),
        latest_year: years.last().map(|y| y.year),
        year_over_year: latest_pair(years.iter().map(|y| y.total_laid_off).collect()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterSizeTotal {
    pub quarter: String,
    pub company_size_category: String,
    pub total_laid_off: i64,
}

/// Layoffs per (quarter, size category), as a dense grid
///
/// Every quarter is paired with every size category seen in scope, missing
/// cells filled with 0. Quarters are chronological; categories follow
/// [`SizeCategory::ALL`], with any unrecognized label after them. Rows
/// labeled `Unknown` are dropped unless `include_unknown` is set.
pub fn totals_by_quarter_and_size(
    cleaned: &DataFrame,
    include_unknown: bool,
) -> Result<Vec<QuarterSizeTotal>> {
    let quarters = row_quarters(cleaned)?;
    let sizes = text_values(cleaned, COMPANY_SIZE_CATEGORY, CONTEXT)?;
    let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;

    let size_rank = |label: &str| {
        SizeCategory::ALL
            .iter()
            .position(|c| c.label() == label)
            .unwrap_or(SizeCategory::ALL.len())
    };

    let mut seen_quarters: BTreeSet<Quarter> = BTreeSet::new();
    let mut seen_sizes: BTreeSet<(usize, &str)> = BTreeSet::new();
    let mut cells: FxHashMap<(Quarter, &str), i64> = FxHashMap::default();

    for idx in 0..cleaned.height() {
        let Some(size) = sizes[idx].as_deref() else {
            continue;
        };
        if !include_unknown && size == SizeCategory::Unknown.label() {
            continue;
        }
        seen_sizes.insert((size_rank(size), size));

        if let Some(quarter) = quarters[idx] {
            seen_quarters.insert(quarter);
            *cells.entry((quarter, size)).or_insert(0) += totals[idx].unwrap_or(0);
        }
    }

    let mut rows = Vec::with_capacity(seen_quarters.len() * seen_sizes.len());
    for &quarter in &seen_quarters {
        for &(_, size) in &seen_sizes {
            rows.push(QuarterSizeTotal {
                quarter: quarter.to_string(),
                company_size_category: size.to_string(),
                total_laid_off: cells.get(&(quarter, size)).copied().unwrap_or(0),
            });
        }
    }
    Ok(rows)
}

/// Headline numbers for a (possibly filtered) cleaned frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub total_laid_off: i64,
    pub companies: usize,
    pub countries: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl DatasetSummary {
    pub fn from_cleaned(cleaned: &DataFrame) -> Result<Self> {
        let totals = i64_values(cleaned, TOTAL_LAID_OFF, CONTEXT)?;
        let companies = text_values(cleaned, COMPANY, CONTEXT)?;
        let countries = text_values(cleaned, COUNTRY, CONTEXT)?;
        let dates: Vec<NaiveDate> = text_values(cleaned, DATE, CONTEXT)?
            .iter()
            .filter_map(|d| parse_date(d.as_deref()))
            .collect();

        let distinct = |values: &[Option<String>]| {
            values
                .iter()
                .filter_map(|v| company_key(v.as_deref()))
                .collect::<FxHashSet<_>>()
                .len()
        };

        Ok(DatasetSummary {
            records: cleaned.height(),
            total_laid_off: totals.iter().flatten().sum(),
            companies: distinct(&companies),
            countries: distinct(&countries),
            first_date: dates.iter().min().copied(),
            last_date: dates.iter().max().copied(),
        })
    }
}

/// One company's layoff history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyProfile {
    pub company: String,
    pub records: usize,
    pub total_laid_off: i64,
    /// Distinct event dates
    pub rounds: usize,
    /// Quarter with the largest total; earliest wins a tie
    pub peak_quarter: Option<String>,
    pub locations: usize,
    pub quarterly: Vec<QuarterTotal>,
    /// Distinct event dates per year, ascending
    pub rounds_per_year: Vec<YearRounds>,
    /// Layoffs per location, largest first
    pub location_totals: Vec<DimensionTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRounds {
    pub year: i32,
    pub rounds: usize,
}

impl CompanyProfile {
    /// Profile `company`, or `None` if it has no records
    pub fn build(cleaned: &DataFrame, company: &str) -> Result<Option<Self>> {
        let names = text_values(cleaned, COMPANY, CONTEXT)?;
        let keep: Vec<bool> = names.iter().map(|n| n.as_deref() == Some(company)).collect();
        if !keep.iter().any(|&k| k) {
            return Ok(None);
        }

        let rows = filter_rows(cleaned, &keep, CONTEXT)?;
        let quarterly = totals_by_quarter(&rows)?;

        let dates: FxHashSet<NaiveDate> = text_values(&rows, DATE, CONTEXT)?
            .iter()
            .filter_map(|d| parse_date(d.as_deref()))
            .collect();
        let mut dates_by_year: BTreeMap<i32, FxHashSet<NaiveDate>> = BTreeMap::new();
        for &date in &dates {
            dates_by_year.entry(date.year()).or_default().insert(date);
        }
        let rounds_per_year = dates_by_year
            .into_iter()
            .map(|(year, dates)| YearRounds {
                year,
                rounds: dates.len(),
            })
            .collect();

        let locations: FxHashSet<String> = text_values(&rows, LOCATION, CONTEXT)?
            .into_iter()
            .flatten()
            .collect();

        // max_by keeps the last maximum, so walk latest-first
        let peak_quarter = quarterly
            .iter()
            .rev()
            .max_by_key(|q| q.total_laid_off)
            .map(|q| q.quarter.clone());

        Ok(Some(CompanyProfile {
            company: company.to_string(),
            records: rows.height(),
            total_laid_off: i64_values(&rows, TOTAL_LAID_OFF, CONTEXT)?.iter().flatten().sum(),
            rounds: dates.len(),
            peak_quarter,
            locations: locations.len(),
            quarterly,
            rounds_per_year,
            location_totals: totals_by_column(&rows, LOCATION)?,
        }))
    }
}
