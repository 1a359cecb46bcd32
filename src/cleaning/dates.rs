//! Lenient date parsing and calendar extraction
//!
//! Parsing is coercing, not strict: anything that matches none of the known
//! layouts becomes `None`. Already-typed polars Date/Datetime columns reach
//! these functions as their string rendering, so they round-trip.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::fmt;

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d %B %Y"];

/// Parse a timestamp in any of the accepted layouts
///
/// Date-only inputs resolve to midnight. Offsets (`Z`, `+02:00`) are
/// normalized to UTC.
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_utc());
    }

    if let Some(parsed) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(parsed);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse the calendar date of an event, dropping any time component
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|timestamp| timestamp.date())
}

fn unix_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// Days since 1970-01-01, the physical representation of a polars Date
pub fn days_since_epoch(date: NaiveDate) -> Option<i32> {
    let epoch = unix_epoch()?.date();
    i32::try_from(date.signed_duration_since(epoch).num_days()).ok()
}

/// Milliseconds since the epoch, the physical representation of Datetime(ms)
pub fn millis_since_epoch(timestamp: NaiveDateTime) -> Option<i64> {
    Some(timestamp.signed_duration_since(unix_epoch()?).num_milliseconds())
}

/// Year-quarter period, displayed as `2023Q1`
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quarter {
    pub year: i32,
    /// 1..=4
    pub quarter: u32,
}

impl Quarter {
    pub fn from_date(date: NaiveDate) -> Self {
        Quarter {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        }
    }

    /// Parse a `2023Q1` label back into a quarter
    pub fn parse(label: &str) -> Option<Self> {
        let (year, quarter) = label.trim().split_once('Q')?;
        let year = year.parse().ok()?;
        let quarter = quarter.parse().ok()?;
        (1..=4).contains(&quarter).then_some(Quarter { year, quarter })
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

/// Calendar components of an event date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParts {
    pub year: i32,
    pub month: i32,
    pub quarter: Quarter,
}

impl CalendarParts {
    pub fn from_date(date: NaiveDate) -> Self {
        CalendarParts {
            year: date.year(),
            month: date.month() as i32,
            quarter: Quarter::from_date(date),
        }
    }
}
