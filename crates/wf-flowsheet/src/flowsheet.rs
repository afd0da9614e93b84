//! Flowsheet container: the time domain plus flowsheet-wide settings.

use wf_core::{Real, TimeSet, WfResult};

/// Top-level container unit models are built against.
///
/// The flowsheet owns the time domain. Blocks indexed by time build one
/// state per point in this set; a steady-state flowsheet has exactly one
/// point.
#[derive(Debug, Clone, PartialEq)]
pub struct Flowsheet {
    name: String,
    dynamic: bool,
    time: TimeSet,
}

impl Flowsheet {
    /// A steady-state flowsheet with a single time point.
    pub fn steady_state(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dynamic: false,
            time: TimeSet::steady_state(),
        }
    }

    /// A dynamic flowsheet over explicit, strictly increasing time points.
    pub fn dynamic(name: impl Into<String>, points: Vec<Real>) -> WfResult<Self> {
        Ok(Self {
            name: name.into(),
            dynamic: true,
            time: TimeSet::from_points(points)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn time(&self) -> &TimeSet {
        &self.time
    }
}
