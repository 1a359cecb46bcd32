//! Company size estimation and bucketing
//!
//! A layoff of `total` people that represents `pct`% of the workforce implies
//! a workforce of `total / (pct / 100)`. The estimate is bucketed into fixed
//! size classes; anything without an estimate is `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

const SMALL_UPPER: i64 = 500;
const MID_UPPER: i64 = 5000;

/// Estimated headcount, rounded to the nearest integer
///
/// `None` when either input is missing, when `pct` is not strictly positive,
/// or when the arithmetic does not produce a finite non-negative number.
pub fn estimate_company_size(total_laid_off: Option<i64>, pct_laid_off: Option<f64>) -> Option<i64> {
    let total = total_laid_off?;
    let pct = pct_laid_off?;
    if !(pct > 0.0) {
        return None;
    }

    let estimate = (total as f64 / (pct / 100.0)).round();
    if !estimate.is_finite() || estimate < 0.0 || estimate > i64::MAX as f64 {
        return None;
    }

    Some(estimate as i64)
}

/// Company size bucket derived from the estimated headcount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeCategory {
    Small,
    Mid,
    Large,
    Unknown,
}

impl SizeCategory {
    /// Display order used by reports
    pub const ALL: [SizeCategory; 4] = [
        SizeCategory::Small,
        SizeCategory::Mid,
        SizeCategory::Large,
        SizeCategory::Unknown,
    ];

    /// Bucket an estimate; lower bounds are inclusive (500 is Mid, 5000 is Large)
    pub fn from_estimate(estimate: Option<i64>) -> Self {
        match estimate {
            None => SizeCategory::Unknown,
            Some(size) if size < SMALL_UPPER => SizeCategory::Small,
            Some(size) if size < MID_UPPER => SizeCategory::Mid,
            Some(_) => SizeCategory::Large,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeCategory::Small => "Small (<500)",
            SizeCategory::Mid => "Mid (500–4999)",
            SizeCategory::Large => "Large (5000+)",
            SizeCategory::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
