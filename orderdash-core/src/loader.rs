//! Tolerant CSV loading.
//!
//! The engine rewrites its files while we poll them, so a half-written or
//! hand-edited row must not take the whole view down. Bad rows are skipped
//! and reported; only an unreadable header or a missing required column
//! fails the file.

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DataError;
use crate::feed::DataSet;

/// A row the loader could not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub message: String,
}

/// Parsed rows plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub rows: Vec<T>,
    pub issues: Vec<RowIssue>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse CSV bytes with a header row into typed rows.
///
/// An empty (or whitespace-only) input is an empty table, the same as a
/// header-only file.
pub fn parse_table<T: DeserializeOwned>(
    bytes: &[u8],
    dataset: DataSet,
) -> Result<Table<T>, DataError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Table::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| DataError::BadHeader {
            dataset,
            message: e.to_string(),
        })?
        .clone();

    for column in dataset.required_columns() {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataError::MissingColumn {
                dataset,
                column,
            });
        }
    }

    let mut table = Table::default();
    for (idx, record) in reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => table.rows.push(row),
            Err(err) => {
                let line = err
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(idx as u64 + 2);
                table.issues.push(RowIssue {
                    line,
                    message: err.to_string(),
                });
            }
        }
    }

    if !table.issues.is_empty() {
        tracing::debug!(
            dataset = %dataset,
            skipped = table.issues.len(),
            "skipped malformed rows"
        );
    }

    Ok(table)
}

/// Read a whole file. A missing file is `Ok(None)`: the engine may simply
/// not have written it yet.
pub fn read_source(path: &Path) -> Result<Option<Vec<u8>>, DataError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DataError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
