//! Cleaner: raw layoff records → canonical, analysis-ready frame
//!
//! Each step is a small total function over one column (see the submodules);
//! [`clean_layoffs`] composes them over a whole frame. Row order is preserved
//! and no per-record problem aborts the batch. The only fatal condition is a
//! structurally missing required column.
//!
//! Steps:
//! 1. `date` / `date_added` → Date / Datetime(ms), unparseable → null
//! 2. `percentage_laid_off` → f64
//! 3. `funds_raised` → `funds_raised_clean` (dollars)
//! 4. `year`, `month`, `quarter` from `date`
//! 5. `estimated_company_size` from headcount and percentage
//! 6. `company_size_category` from the estimate
//! 7. null `country` / `location` → `"Unknown"`

pub mod company_size;
pub mod dates;
pub mod funding;
pub mod numeric;
pub mod report;

pub use company_size::{estimate_company_size, SizeCategory};
pub use dates::{parse_date, parse_timestamp, CalendarParts, Quarter};
pub use funding::parse_funding;
pub use numeric::{is_null_token, parse_count, parse_percentage};
pub use report::{CleaningReport, SizeStats};

use crate::error::Result;
use crate::schema::*;
use crate::utils::{require_columns, text_values};
use polars::prelude::*;

const CONTEXT: &str = "Cleaner";

/// Clean a raw layoff frame
///
/// Adds `funds_raised_clean`, `year`, `month`, `quarter`,
/// `estimated_company_size` and `company_size_category`, and replaces `date`,
/// `date_added`, `total_laid_off`, `percentage_laid_off`, `country` and
/// `location` with their normalized forms. Every other column passes through
/// untouched.
///
/// # Errors
/// `MissingColumn` when any of [`REQUIRED_RAW_COLUMNS`] is absent.
pub fn clean_layoffs(raw: &DataFrame) -> Result<DataFrame> {
    require_columns(raw, &REQUIRED_RAW_COLUMNS, CONTEXT)?;

    // STEP 1: dates
    let raw_dates = text_values(raw, DATE, CONTEXT)?;
    let event_dates: Vec<_> = raw_dates.iter().map(|v| parse_date(v.as_deref())).collect();

    let raw_added = text_values(raw, DATE_ADDED, CONTEXT)?;
    let added: Vec<_> = raw_added.iter().map(|v| parse_timestamp(v.as_deref())).collect();

    // STEP 2: percentage, plus the headcount the size estimate depends on
    let raw_pct = text_values(raw, PERCENTAGE_LAID_OFF, CONTEXT)?;
    let pct: Vec<Option<f64>> = raw_pct.iter().map(|v| parse_percentage(v.as_deref())).collect();

    let raw_totals = text_values(raw, TOTAL_LAID_OFF, CONTEXT)?;
    let totals: Vec<Option<i64>> = raw_totals.iter().map(|v| parse_count(v.as_deref())).collect();

    // STEP 3: funding
    let raw_funds = text_values(raw, FUNDS_RAISED, CONTEXT)?;
    let funds: Vec<Option<f64>> = raw_funds.iter().map(|v| parse_funding(v.as_deref())).collect();

    log_unparsed(DATE, &raw_dates, &event_dates);
    log_unparsed(DATE_ADDED, &raw_added, &added);
    log_unparsed(PERCENTAGE_LAID_OFF, &raw_pct, &pct);
    log_unparsed(TOTAL_LAID_OFF, &raw_totals, &totals);
    log_unparsed(FUNDS_RAISED, &raw_funds, &funds);

    // STEP 4: calendar parts
    let calendar: Vec<Option<CalendarParts>> =
        event_dates.iter().map(|d| d.map(CalendarParts::from_date)).collect();

    // STEP 5 + 6: size estimate and bucket
    let sizes: Vec<Option<i64>> = totals
        .iter()
        .zip(&pct)
        .map(|(&total, &p)| estimate_company_size(total, p))
        .collect();
    let categories: Vec<&str> = sizes
        .iter()
        .map(|&size| SizeCategory::from_estimate(size).label())
        .collect();

    // STEP 7: geography
    let countries = fill_unknown(text_values(raw, COUNTRY, CONTEXT)?);
    let locations = fill_unknown(text_values(raw, LOCATION, CONTEXT)?);

    let date_days: Vec<Option<i32>> = event_dates
        .iter()
        .map(|d| d.and_then(dates::days_since_epoch))
        .collect();
    let added_millis: Vec<Option<i64>> = added
        .iter()
        .map(|t| t.and_then(dates::millis_since_epoch))
        .collect();

    let mut cleaned = raw.clone();
    cleaned.with_column(Column::new(DATE.into(), date_days).cast(&DataType::Date)?)?;
    cleaned.with_column(
        Column::new(DATE_ADDED.into(), added_millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
    )?;
    cleaned.with_column(Column::new(TOTAL_LAID_OFF.into(), totals))?;
    cleaned.with_column(Column::new(PERCENTAGE_LAID_OFF.into(), pct))?;
    cleaned.with_column(Column::new(FUNDS_RAISED_CLEAN.into(), funds))?;
    cleaned.with_column(Column::new(
        YEAR.into(),
        calendar.iter().map(|c| c.map(|c| c.year)).collect::<Vec<_>>(),
    ))?;
    cleaned.with_column(Column::new(
        MONTH.into(),
        calendar.iter().map(|c| c.map(|c| c.month)).collect::<Vec<_>>(),
    ))?;
    cleaned.with_column(Column::new(
        QUARTER.into(),
        calendar
            .iter()
            .map(|c| c.map(|c| c.quarter.to_string()))
            .collect::<Vec<_>>(),
    ))?;
    cleaned.with_column(Column::new(ESTIMATED_COMPANY_SIZE.into(), sizes))?;
    cleaned.with_column(Column::new(COMPANY_SIZE_CATEGORY.into(), categories))?;
    cleaned.with_column(Column::new(COUNTRY.into(), countries))?;
    cleaned.with_column(Column::new(LOCATION.into(), locations))?;

    tracing::debug!("{}: cleaned {} rows", CONTEXT, cleaned.height());

    Ok(cleaned)
}

/// Clean and summarize in one call
pub fn clean_layoffs_with_report(raw: &DataFrame) -> Result<(DataFrame, CleaningReport)> {
    let cleaned = clean_layoffs(raw)?;
    let report = CleaningReport::from_cleaned(&cleaned)?;
    Ok((cleaned, report))
}

fn fill_unknown(values: Vec<Option<String>>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| UNKNOWN.to_string()))
        .collect()
}

/// Raw values that carried data but parsed to null
///
/// Blanks and explicit null markers (`nan`, `None`) were never data, so they
/// are not counted.
fn unparsed_count<T>(raw: &[Option<String>], parsed: &[Option<T>]) -> usize {
    raw.iter()
        .zip(parsed)
        .filter(|(r, p)| r.as_deref().is_some_and(|text| !is_null_token(text)) && p.is_none())
        .count()
}

fn log_unparsed<T>(column: &str, raw: &[Option<String>], parsed: &[Option<T>]) {
    let dropped = unparsed_count(raw, parsed);
    if dropped > 0 {
        tracing::warn!(
            "{}: {} '{}' values could not be parsed and were set to null",
            CONTEXT,
            dropped,
            column
        );
    }
}
