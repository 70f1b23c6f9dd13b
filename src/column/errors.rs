//! Column registry error types

use thiserror::Error;

/// Result type for column registry operations
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Errors raised when resolving column names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    /// The table does not register a column under this name
    #[error("unknown column: {column}")]
    UnknownColumn { column: String },
}

impl ColumnError {
    pub fn unknown(column: impl Into<String>) -> Self {
        ColumnError::UnknownColumn {
            column: column.into(),
        }
    }
}
