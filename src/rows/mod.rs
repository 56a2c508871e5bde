// Rows module - turns query result sets into CSV or JSON text

pub mod cursor;
pub mod format;
pub mod pool;
pub mod value;

pub use cursor::{Cell, MemoryRows, ResultSet, RowCursor};
pub use format::{rows_to_csv, rows_to_json, write_rows, OutputFormat};
pub use value::{append_value, Value};
