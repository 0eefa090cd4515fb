//! Error types for the slashq crate.
//!
//! Only semantic construction failures surface as errors. Segments that do
//! not decode are dropped by the compiler and filters that cannot be applied
//! are ignored by the executor, so neither produces a [`QueryError`].

use thiserror::Error;

/// Errors that can occur when constructing operations or compiling queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Page numbers start at 1.
    #[error("page number cannot be less than 1, got {0}")]
    InvalidPageNumber(i64),

    /// Page sizes start at 1.
    #[error("page size cannot be less than 1, got {0}")]
    InvalidPageSize(i64),

    /// A sort needs at least one column.
    #[error("must specify columns for sort")]
    EmptySort,

    /// The syntax configuration is unusable.
    #[error("invalid query syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for slashq operations.
pub type Result<T> = std::result::Result<T, QueryError>;
