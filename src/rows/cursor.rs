// Row cursors
// The serializers read rows through the RowCursor trait so any driver can be
// plugged in. MemoryRows is an in-memory implementation used by the CLI and
// the tests.

use super::Value;
use crate::error::{CursorError, Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A single-pass, pull-based source of result rows with a fixed column set
///
/// The expected call sequence is `columns` once, then `advance` followed by
/// `scan` for every row, then `err` once `advance` has returned false.
pub trait RowCursor {
    /// Column names of the current result set, in order
    fn columns(&mut self) -> Result<Vec<String>, CursorError>;

    /// Move to the next row. Returns false when the result set is exhausted
    /// or iteration stopped because of an error.
    fn advance(&mut self) -> bool;

    /// Copy the cells of the current row into dst, one per column
    fn scan(&mut self, dst: &mut [Value]) -> Result<(), CursorError>;

    /// The error that ended iteration early, if any
    fn err(&mut self) -> Option<CursorError>;
}

/// A native cell representation that can be converted into a `Value`
pub trait Cell {
    /// Fails with `Error::UnknownValueType` when the native type has no
    /// scalar `Value` form.
    fn to_value(&self) -> Result<Value>;
}

impl Cell for Value {
    fn to_value(&self) -> Result<Value> {
        Ok(self.clone())
    }
}

impl Cell for serde_json::Value {
    fn to_value(&self) -> Result<Value> {
        Value::try_from(self.clone())
    }
}

/// One result set: column names plus rows of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet<C = Value> {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<C>>,
}

impl<C> ResultSet<C> {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<C>>) -> Self {
        Self { columns, rows }
    }
}

/// A rows document is either a single result set or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum RowsDocument {
    Many(Vec<ResultSet<serde_json::Value>>),
    One(ResultSet<serde_json::Value>),
}

/// An in-memory cursor over one or more result sets
#[derive(Debug, Clone)]
pub struct MemoryRows<C = Value> {
    sets: Vec<ResultSet<C>>,
    /// Index of the current result set
    set: usize,
    /// Index of the current row, None before the first `advance`
    row: Option<usize>,
}

impl<C: Cell> MemoryRows<C> {
    /// A cursor over a single result set
    pub fn new(columns: Vec<String>, rows: Vec<Vec<C>>) -> Self {
        Self::from_sets(vec![ResultSet::new(columns, rows)])
    }

    /// A cursor over several result sets, positioned on the first
    pub fn from_sets(sets: Vec<ResultSet<C>>) -> Self {
        Self {
            sets,
            set: 0,
            row: None,
        }
    }

    /// Move to the next result set. Returns false if there is none.
    pub fn next_result_set(&mut self) -> bool {
        if self.set < self.sets.len() {
            self.set += 1;
        }
        self.row = None;
        self.set < self.sets.len()
    }

    /// Number of result sets, including ones already consumed
    pub fn result_set_count(&self) -> usize {
        self.sets.len()
    }

    fn current(&self) -> Option<&ResultSet<C>> {
        self.sets.get(self.set)
    }
}

impl MemoryRows<serde_json::Value> {
    /// Decode a rows document
    ///
    /// The document is either `{"columns": [...], "rows": [[...], ...]}` or a
    /// JSON array of such objects. Cells stay in their JSON form until they
    /// are scanned.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let sets = match serde_json::from_reader(reader)? {
            RowsDocument::Many(sets) => sets,
            RowsDocument::One(set) => vec![set],
        };
        Ok(Self::from_sets(sets))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

impl<C: Cell> RowCursor for MemoryRows<C> {
    fn columns(&mut self) -> Result<Vec<String>, CursorError> {
        self.current()
            .map(|set| set.columns.clone())
            .ok_or_else(|| CursorError::driver("no result set available"))
    }

    fn advance(&mut self) -> bool {
        let Some(len) = self.current().map(|set| set.rows.len()) else {
            return false;
        };

        let next = self.row.map_or(0, |row| row + 1);
        if next < len {
            self.row = Some(next);
            true
        } else {
            self.row = Some(len);
            false
        }
    }

    fn scan(&mut self, dst: &mut [Value]) -> Result<(), CursorError> {
        let set = self
            .current()
            .ok_or_else(|| CursorError::driver("no result set available"))?;
        let cells = self
            .row
            .and_then(|row| set.rows.get(row))
            .ok_or_else(|| CursorError::driver("scan called without a current row"))?;

        if cells.len() != dst.len() {
            return Err(CursorError::driver(format!(
                "expected {} destination values, got {}",
                cells.len(),
                dst.len()
            )));
        }

        for ((slot, cell), column) in dst.iter_mut().zip(cells).zip(&set.columns) {
            *slot = cell.to_value().map_err(|err| match err {
                Error::UnknownValueType { type_name } => CursorError::UnknownType {
                    column: column.clone(),
                    type_name,
                },
                other => CursorError::driver(other),
            })?;
        }

        Ok(())
    }

    fn err(&mut self) -> Option<CursorError> {
        None
    }
}
