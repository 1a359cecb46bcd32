//! DataFrame access helpers with column validation
//!
//! Every read of a named column goes through here so that a structurally
//! missing column surfaces as [`LayoffError::MissingColumn`] with the caller's
//! context, instead of a bare polars `ColumnNotFound`.
//!
//! Values are pulled out through a cast so callers work the same whether a
//! column arrived as text (raw CSV) or already typed (a cleaned frame).

use crate::error::{LayoffError, Result};
use polars::prelude::*;

/// Check that every column in `columns` exists in `df`
///
/// # Errors
/// Returns `MissingColumn` for the first absent column.
pub fn require_columns(df: &DataFrame, columns: &[&str], context: &str) -> Result<()> {
    let present: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();

    for &expected in columns {
        if !present.contains(&expected) {
            return Err(LayoffError::missing_column(expected, context));
        }
    }

    Ok(())
}

fn required_column<'a>(df: &'a DataFrame, name: &str, context: &str) -> Result<&'a Column> {
    require_columns(df, &[name], context)?;
    Ok(df.column(name)?)
}

/// Column values rendered as text (dates become ISO strings, numbers their
/// decimal form)
pub fn text_values(df: &DataFrame, name: &str, context: &str) -> Result<Vec<Option<String>>> {
    let as_text = required_column(df, name, context)?.cast(&DataType::String)?;
    let values = as_text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

/// Column values as f64; text that is not a number becomes null
pub fn f64_values(df: &DataFrame, name: &str, context: &str) -> Result<Vec<Option<f64>>> {
    let as_float = required_column(df, name, context)?.cast(&DataType::Float64)?;
    let values = as_float
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect();
    Ok(values)
}

/// Column values as i64
pub fn i64_values(df: &DataFrame, name: &str, context: &str) -> Result<Vec<Option<i64>>> {
    let as_int = required_column(df, name, context)?.cast(&DataType::Int64)?;
    Ok(as_int.i64()?.into_iter().collect())
}

/// Company key for grouping: blank names count as missing
pub fn company_key(value: Option<&str>) -> Option<&str> {
    value.filter(|name| !name.trim().is_empty())
}

/// Keep the rows whose flag is set, preserving their relative order
pub fn filter_rows(df: &DataFrame, keep: &[bool], context: &str) -> Result<DataFrame> {
    if keep.len() != df.height() {
        return Err(LayoffError::Config(format!(
            "{}: row mask has {} entries for {} rows",
            context,
            keep.len(),
            df.height()
        )));
    }

    let mask: BooleanChunked = keep.iter().copied().collect();
    Ok(df.filter(&mask)?)
}
