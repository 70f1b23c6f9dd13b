//! Table contract error types

use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised by table-level operations.
///
/// These fail the specific call, never the table: a table stays fully
/// queryable after rejecting a `find_object`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The operation needs a unique key→row mapping this table cannot
    /// provide (e.g. direct lookup on a many-to-many join table)
    #[error("table {table} does not support {operation}")]
    UnsupportedOperation {
        table: &'static str,
        operation: &'static str,
    },

    /// Lookup miss on a table that does support direct lookup
    #[error("table {table}: no object with key {key}")]
    NotFound { table: &'static str, key: String },
}

impl TableError {
    pub fn unsupported(table: &'static str, operation: &'static str) -> Self {
        TableError::UnsupportedOperation { table, operation }
    }

    pub fn not_found(table: &'static str, key: impl Into<String>) -> Self {
        TableError::NotFound {
            table,
            key: key.into(),
        }
    }
}
