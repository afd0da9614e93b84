//! Numeric scalar type and floating-point helpers.

use crate::error::{WfError, WfResult};

/// The scalar used throughout the workspace. Model equations, solver
/// vectors, and reports all agree on this one type.
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-10,
            rel: 1e-8,
        }
    }
}

/// Compare two floats under a combined absolute/relative tolerance.
#[must_use]
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= tol.abs || diff <= tol.rel * scale
}

/// Reject NaN and infinities at model boundaries.
///
/// `what` names the quantity for the error message, e.g. `"S_IN"` or
/// `"temperature"`.
pub fn ensure_finite(value: Real, what: &str) -> WfResult<Real> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WfError::NonFinite {
            what: what.to_string(),
            value,
        })
    }
}
