//! Reading and writing layoff frames
//!
//! Raw CSVs are read with every column as text so that cleaning sees the
//! values exactly as written. Output format follows the file extension:
//! `.parquet` gets Parquet with ZSTD, anything else gets CSV.

use crate::error::{LayoffError, Result};
use crate::schema::REQUIRED_RAW_COLUMNS;
use crate::utils::require_columns;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Load a raw layoffs CSV
///
/// All columns are read as strings (no schema inference). Fails with
/// `MissingColumn` if the file lacks any column the cleaner needs.
pub fn load_raw_csv(path: &Path) -> Result<DataFrame> {
    let df = read_csv_as_text(path)?;
    require_columns(&df, &REQUIRED_RAW_COLUMNS, "load_raw_csv")?;
    tracing::info!("Loaded {} raw records from {:?}", df.height(), path);
    Ok(df)
}

/// Load any CSV with every column as text
///
/// Used for previously cleaned output as well as raw input; the cleaning
/// transforms accept either.
pub fn read_csv_as_text(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(LayoffError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {:?}", path),
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Load a Parquet file written by [`write_frame`]
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}

/// Write `df` to `path`, creating parent directories as needed
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    if is_parquet(path) {
        ParquetWriter::new(&mut file)
            .with_compression(ParquetCompression::Zstd(None))
            .finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }

    tracing::info!("Wrote {} rows x {} columns to {:?}", df.height(), df.width(), path);
    Ok(())
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}
