// Result set serializers
// Append the rows of a cursor to a byte buffer as CSV or JSON

use super::pool::VALUE_POOL;
use super::value::append_value;
use super::{RowCursor, Value};
use crate::error::{CursorError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header line plus one comma separated line per row
    Csv,
    /// A single array of objects, one per row
    #[default]
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Append the rows of the current result set to dst in the given format
pub fn write_rows<R: RowCursor>(
    format: OutputFormat,
    dst: Vec<u8>,
    rows: &mut R,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => rows_to_csv(dst, rows),
        OutputFormat::Json => rows_to_json(dst, rows),
    }
}

/// Fetch the column names, rejecting an empty column set
fn fetch_columns<R: RowCursor>(rows: &mut R) -> Result<Vec<String>> {
    let cols = rows.columns().map_err(Error::ColumnFetchFailed)?;
    if cols.is_empty() {
        return Err(Error::ZeroColumns);
    }
    Ok(cols)
}

fn scan_row<R: RowCursor>(rows: &mut R, vals: &mut [Value]) -> Result<()> {
    rows.scan(vals).map_err(|err| match err {
        CursorError::UnknownType { type_name, .. } => Error::UnknownValueType { type_name },
        other => Error::RowScanFailed(other),
    })
}

fn finish<R: RowCursor>(rows: &mut R) -> Result<()> {
    match rows.err() {
        Some(err) => Err(Error::CursorIterationFailed(err)),
        None => Ok(()),
    }
}

/// Append to dst the CSV representation of the current result set
///
/// The first line holds the column names. Fields are separated by `,` and
/// every line ends with `\n`. Neither column names nor values are CSV
/// quoted, so a comma or newline inside a value is written as is; strings are
/// double quoted with JSON escaping, which turns newlines into `\n`.
/// Null cells are written as empty fields.
///
/// Only the current result set is read. Call again after moving the cursor
/// to the next result set to serialize it too. On error dst is dropped.
pub fn rows_to_csv<R: RowCursor>(mut dst: Vec<u8>, rows: &mut R) -> Result<Vec<u8>> {
    let cols = fetch_columns(rows)?;

    let mut vals = VALUE_POOL.acquire(cols.len());

    for (i, col) in cols.iter().enumerate() {
        if i > 0 {
            dst.push(b',');
        }
        dst.extend_from_slice(col.as_bytes());
    }
    dst.push(b'\n');

    let mut count = 0usize;
    while rows.advance() {
        scan_row(rows, &mut vals)?;

        for (i, val) in vals.iter().enumerate() {
            if i > 0 {
                dst.push(b',');
            }
            if !val.is_null() {
                append_value(&mut dst, val)?;
            }
        }
        dst.push(b'\n');

        count += 1;
    }

    finish(rows)?;

    tracing::debug!(
        format = "csv",
        columns = cols.len(),
        rows = count,
        bytes = dst.len(),
        "serialized rows"
    );

    Ok(dst)
}

/// Append to dst the JSON representation of the current result set
///
/// Produces an array with one object per row, keyed by column name in column
/// order. Column names are quoted but not escaped. Null cells are written as
/// `null`. Non-finite floats are written as `NaN`, `+Inf` and `-Inf`, which
/// are not valid JSON numbers, so such output does not parse as JSON.
///
/// Only the current result set is read. Call again after moving the cursor
/// to the next result set to serialize it too. On error dst is dropped.
pub fn rows_to_json<R: RowCursor>(mut dst: Vec<u8>, rows: &mut R) -> Result<Vec<u8>> {
    let cols = fetch_columns(rows)?;

    let mut vals = VALUE_POOL.acquire(cols.len());

    dst.push(b'[');

    let mut count = 0usize;
    while rows.advance() {
        scan_row(rows, &mut vals)?;

        if count > 0 {
            dst.push(b',');
        }
        dst.push(b'{');

        for (i, (col, val)) in cols.iter().zip(vals.iter()).enumerate() {
            if i > 0 {
                dst.push(b',');
            }

            dst.push(b'"');
            dst.extend_from_slice(col.as_bytes());
            dst.extend_from_slice(b"\":");

            append_value(&mut dst, val)?;
        }

        dst.push(b'}');
        count += 1;
    }

    dst.push(b']');

    finish(rows)?;

    tracing::debug!(
        format = "json",
        columns = cols.len(),
        rows = count,
        bytes = dst.len(),
        "serialized rows"
    );

    Ok(dst)
}
