// Error types
// Every failure in the library is terminal for the call it happens in

use thiserror::Error;

/// Boxed error produced by a database driver
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the query parser and the row serializers
#[derive(Debug, Error)]
pub enum Error {
    /// A `:` was not followed by a parameter name
    #[error("named query is malformed")]
    MalformedNamedQuery,

    /// A named parameter had no value when binding
    #[error("no value provided for named parameter '{name}'")]
    MissingParameter { name: String },

    #[error("failed to fetch columns")]
    ColumnFetchFailed(#[source] CursorError),

    #[error("zero columns resultant from sql query")]
    ZeroColumns,

    #[error("got an error while scanning")]
    RowScanFailed(#[source] CursorError),

    /// A cell held a type that has no `Value` mapping
    #[error("encountered unknown type '{type_name}' while scanning")]
    UnknownValueType { type_name: String },

    #[error("row iteration failed")]
    CursorIterationFailed(#[source] CursorError),

    #[error("unknown output format '{0}', expected one of: csv, json")]
    UnknownFormat(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors reported by a `RowCursor` implementation
#[derive(Debug, Error)]
pub enum CursorError {
    /// The driver handed back a native type that cannot be represented
    #[error("column '{column}' has unsupported type '{type_name}'")]
    UnknownType { column: String, type_name: String },

    #[error("{0}")]
    Driver(DriverError),
}

impl CursorError {
    /// Wrap any driver error
    pub fn driver<E>(err: E) -> Self
    where
        E: Into<DriverError>,
    {
        CursorError::Driver(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
