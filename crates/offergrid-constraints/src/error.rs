//! Constraint registry error types.

use thiserror::Error;

/// Result type alias for registry operations.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors raised while registering filters for a task.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("invalid filter passed in: {0}. Allowed filters are SCALAR, TEXT, SET, RANGES, and STRATEGY")]
    InvalidKind(String),

    #[error("strategy filter for task {0} has no value")]
    MissingStrategy(String),
}
