//! Percentage and headcount normalization
//!
//! Both are total functions from raw text to `Option`: malformed input is
//! null, never an error. Feeding an already-cleaned value back in (e.g. the
//! text rendering of `25.0`) yields the same value, which keeps cleaning
//! idempotent.

/// Literal placeholders the raw export uses for a missing value
const NULL_TOKENS: [&str; 3] = ["nan", "None", ""];

/// True for a value the export wrote as an explicit missing marker
pub fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

/// `"25%"` → `Some(25.0)`; `"nan"`, `"None"`, `""` and leftover garbage → `None`
pub fn parse_percentage(raw: Option<&str>) -> Option<f64> {
    let without_sign = raw?.replace('%', "");
    let value = without_sign.trim();
    if NULL_TOKENS.contains(&value) {
        return None;
    }

    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whole, non-negative headcount; `"100"` and `"100.0"` both parse to 100
pub fn parse_count(raw: Option<&str>) -> Option<i64> {
    let value = raw?.trim();
    if NULL_TOKENS.contains(&value) {
        return None;
    }

    let number = value.parse::<f64>().ok()?;
    if !number.is_finite() || number < 0.0 || number.fract() != 0.0 || number > i64::MAX as f64 {
        return None;
    }

    Some(number as i64)
}
