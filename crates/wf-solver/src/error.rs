//! Error types for solver operations.

use thiserror::Error;

/// Errors from setting up a solve.
///
/// Failure to converge is deliberately not represented here: it comes back
/// as a status inside the outcome so callers can release held state and
/// report the condition instead of unwinding.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("system is not square: {variables} free variables vs {residuals} residuals")]
    NotSquare { variables: usize, residuals: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;
