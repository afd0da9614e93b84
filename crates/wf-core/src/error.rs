//! Shared error types for the wasteflow crates.

use thiserror::Error;

/// Errors produced by the core layer.
///
/// Downstream crates define their own error enums and convert into these
/// where the failure is a plain numeric or argument problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WfError {
    /// A computed or supplied value was NaN or infinite.
    #[error("non-finite value for {what}: {value}")]
    NonFinite { what: String, value: f64 },

    /// An argument failed validation before any computation ran.
    #[error("invalid argument: {what}")]
    InvalidArgument { what: String },

    /// An internal invariant was violated; indicates a bug in the caller.
    #[error("invariant violated: {what}")]
    Invariant { what: String },
}

pub type WfResult<T> = Result<T, WfError>;
