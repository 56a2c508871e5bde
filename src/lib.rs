// sqlutil - helpers for working with SQL statements and their results
// Named parameter rewriting plus CSV/JSON serialization of result sets

pub mod error;
pub mod query;
pub mod rows;

// Re-export commonly used types for convenience
pub use error::{CursorError, Error, Result};
pub use query::NamedQuery;
pub use rows::{
    rows_to_csv, rows_to_json, write_rows, MemoryRows, OutputFormat, ResultSet, RowCursor, Value,
};
