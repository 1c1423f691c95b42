//! Solver error types.

use thiserror::Error;

/// Error returned when reading the result of an evaluation.
///
/// Every abnormal end is reported the same way: short-circuit of an
/// ancestor, an explicit `cancel()`, solver `stop()`, and internal faults
/// all surface as [`SolveError::Cancelled`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The evaluation ended without a value.
    #[error("evaluation was cancelled")]
    Cancelled,
}

/// Error creating a solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The worker runtime could not be built.
    #[error("failed to build solver runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
