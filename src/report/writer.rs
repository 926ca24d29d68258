//! CSV and JSON output. Tables are written whole; exact duplicate rows are
//! dropped, keeping the first occurrence. Every table starts with a header
//! row, including tables with no rows.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode CSV for '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("failed to encode manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// A row type written as one CSV table.
pub trait CsvTable: Serialize {
    /// Column names in serialization order.
    const HEADERS: &'static [&'static str];
}

/// Encode one row without headers; used as its identity for de-duplication.
fn encode_row<T: Serialize>(row: &T, path: &Path) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(row).map_err(|source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    writer.into_inner().map_err(|err| ReportError::Io {
        path: path.to_path_buf(),
        source: err.into_error(),
    })
}

/// Rows that remain after dropping exact duplicates, in original order.
pub fn dedup_rows<'a, T: Serialize>(rows: &'a [T], path: &Path) -> Result<Vec<&'a T>, ReportError> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(encode_row(row, path)?) {
            unique.push(row);
        }
    }
    Ok(unique)
}

/// Write `rows` as CSV with a header row. Returns the number of rows written.
pub fn write_table<T: CsvTable>(path: &Path, rows: &[T]) -> Result<usize, ReportError> {
    let unique = dedup_rows(rows, path)?;
    let csv_err = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if unique.is_empty() {
        writer.write_record(T::HEADERS).map_err(csv_err)?;
    }
    for row in &unique {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if unique.len() < rows.len() {
        tracing::debug!(
            dropped = rows.len() - unique.len(),
            "dropped duplicate rows from {}",
            path.display()
        );
    }
    Ok(unique.len())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let payload = serde_json::to_string_pretty(value)?;
    fs::write(path, payload).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
