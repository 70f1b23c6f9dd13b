//! Query construction error types
//!
//! A query that fails construction never scans a single row and emits
//! nothing; there are no partial results.

use thiserror::Error;

use crate::filter::FilterError;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while validating a query against its target table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A requested output column is not registered on the target table
    #[error("invalid column: {column}")]
    InvalidColumn { column: String },

    /// The filter tree failed compilation (unknown column, type mismatch,
    /// bad pattern)
    #[error(transparent)]
    Filter(#[from] FilterError),
}
