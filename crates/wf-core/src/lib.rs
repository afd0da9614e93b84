//! wf-core: stable foundation shared by every wasteflow crate.
//!
//! Contains:
//! - units (uom SI aliases plus constructors for the units used at model
//!   boundaries)
//! - numeric (the `Real` scalar, tolerances, float helpers)
//! - var (process variables with fix/unfix bookkeeping)
//! - time (the simulation time domain)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod time;
pub mod units;
pub mod var;

pub use error::{WfError, WfResult};
pub use numeric::{Real, Tolerances, ensure_finite, nearly_equal};
pub use time::TimeSet;
pub use units::{Pressure, Temperature, VolumeRate, k, m3pd, m3ps, pa};
pub use var::Var;
