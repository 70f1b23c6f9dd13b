//! Filter construction error types
//!
//! Everything here is detected while compiling a filter tree against a
//! table's column registry, before any row is scanned. Per-row conditions
//! (absent data) are modeled as values, never as errors.

use thiserror::Error;

use crate::value::ValueType;

/// Result type for filter construction
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while compiling a filter tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A leaf references a column the table does not register
    #[error("filter references unknown column: {column}")]
    UnknownColumn { column: String },

    /// The literal cannot be compared against the column's declared type
    #[error("filter on column {column} ({column_type}): operator {op} cannot take a {literal} literal")]
    TypeMismatch {
        column: String,
        column_type: ValueType,
        op: &'static str,
        literal: &'static str,
    },

    /// The match pattern is not a valid regular expression
    #[error("invalid match pattern on column {column}: {reason}")]
    BadPattern { column: String, reason: String },
}
