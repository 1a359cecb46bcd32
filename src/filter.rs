//! Record filtering over a cleaned frame
//!
//! Mirrors the dashboard's sidebar selections: a record is kept when it
//! matches every non-empty selection. An empty selection means "any".

use crate::error::Result;
use crate::schema::{COMPANY, COUNTRY, INDUSTRY, YEAR};
use crate::utils::{filter_rows, i64_values, text_values};
use polars::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

const CONTEXT: &str = "LayoffFilter";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoffFilter {
    pub years: Vec<i32>,
    pub industries: Vec<String>,
    pub countries: Vec<String>,
    pub companies: Vec<String>,
}

impl LayoffFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    pub fn with_industries<S: Into<String>>(mut self, industries: impl IntoIterator<Item = S>) -> Self {
        self.industries.extend(industries.into_iter().map(Into::into));
        self
    }

    pub fn with_countries<S: Into<String>>(mut self, countries: impl IntoIterator<Item = S>) -> Self {
        self.countries.extend(countries.into_iter().map(Into::into));
        self
    }

    pub fn with_companies<S: Into<String>>(mut self, companies: impl IntoIterator<Item = S>) -> Self {
        self.companies.extend(companies.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
            && self.industries.is_empty()
            && self.countries.is_empty()
            && self.companies.is_empty()
    }

    /// Rows of `cleaned` matching every selection, input order kept
    ///
    /// Only the columns of active selections are read, so an empty filter
    /// works on any frame.
    pub fn apply(&self, cleaned: &DataFrame) -> Result<DataFrame> {
        if self.is_empty() {
            return Ok(cleaned.clone());
        }

        let mut keep = vec![true; cleaned.height()];

        if !self.years.is_empty() {
            let wanted: FxHashSet<i64> = self.years.iter().map(|&y| i64::from(y)).collect();
            let years = i64_values(cleaned, YEAR, CONTEXT)?;
            for (flag, year) in keep.iter_mut().zip(&years) {
                *flag &= year.is_some_and(|y| wanted.contains(&y));
            }
        }

        for (selection, column) in [
            (&self.industries, INDUSTRY),
            (&self.countries, COUNTRY),
            (&self.companies, COMPANY),
        ] {
            if selection.is_empty() {
                continue;
            }
            let wanted: FxHashSet<&str> = selection.iter().map(String::as_str).collect();
            let values = text_values(cleaned, column, CONTEXT)?;
            for (flag, value) in keep.iter_mut().zip(&values) {
                *flag &= value.as_deref().is_some_and(|v| wanted.contains(v));
            }
        }

        let filtered = filter_rows(cleaned, &keep, CONTEXT)?;
        tracing::debug!(
            "{}: kept {} of {} rows",
            CONTEXT,
            filtered.height(),
            cleaned.height()
        );
        Ok(filtered)
    }
}
