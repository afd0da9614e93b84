//! Error types for the property layer.

use thiserror::Error;
use wf_core::WfError;

#[derive(Debug, Error)]
pub enum PropertyError {
    /// A state block argument was not recognised by the package.
    #[error("unknown state block argument {key:?} for property package {package}")]
    UnknownArgument { package: &'static str, key: String },

    /// A state block argument carried an unusable value.
    #[error("invalid value for state block argument {key:?}: {reason}")]
    InvalidArgument { key: String, reason: String },

    /// A state variable sat outside its physical range.
    #[error("non-physical state: {what}")]
    NonPhysical { what: String },

    #[error(transparent)]
    Core(#[from] WfError),
}

pub type PropertyResult<T> = Result<T, PropertyError>;
