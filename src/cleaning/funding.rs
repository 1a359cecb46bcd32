//! Funding amount normalization
//!
//! Raw amounts look like `$1.5M`, `$2B`, `$120,000` or plain numbers. The
//! result is always raw dollars.

const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;

/// Expand a raw funding string into dollars
///
/// Strips `$` and `,`, uppercases, then applies a trailing `M` (×1e6) or `B`
/// (×1e9) to the numeric prefix. Anything unparseable, and any negative
/// amount, is `None`.
pub fn parse_funding(raw: Option<&str>) -> Option<f64> {
    let normalized = raw?.replace(['$', ','], "").trim().to_uppercase();

    let (number, multiplier) = if let Some(prefix) = normalized.strip_suffix('M') {
        (prefix, MILLION)
    } else if let Some(prefix) = normalized.strip_suffix('B') {
        (prefix, BILLION)
    } else {
        (normalized.as_str(), 1.0)
    };

    let amount = number.trim().parse::<f64>().ok()? * multiplier;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}
