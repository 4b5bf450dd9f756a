//! Resource manager error types.

use thiserror::Error;

/// Errors returned by the resource manager.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    /// No offer in the current pool fits the task. Expected whenever
    /// demand exceeds supply; retry with the next offer batch.
    #[error("cannot find a suitable offer for task {0}")]
    NoSuitableOffer(String),

    #[error("constraint error: {0}")]
    Constraint(#[from] offergrid_constraints::ConstraintError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;
