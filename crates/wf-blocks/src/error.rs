//! Error types for unit model blocks.

use thiserror::Error;
use wf_properties::PropertyError;
use wf_solver::SolverError;

#[derive(Debug, Error)]
pub enum BlockError {
    /// The block configuration asked for something the model cannot honour.
    #[error("configuration error: {what}")]
    Config { what: String },

    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type BlockResult<T> = Result<T, BlockError>;
