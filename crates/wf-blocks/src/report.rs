//! Serialisable solve and translation summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wf_core::Real;
use wf_core::units::SECONDS_PER_DAY;
use wf_solver::NewtonOutcome;

/// Summary of one solve, in a form that serialises cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveReport {
    /// Termination condition, e.g. `"optimal"` or `"iteration_limit"`.
    pub termination: String,
    pub optimal: bool,
    pub iterations: usize,
    pub residual_norm: Real,
}

impl SolveReport {
    pub fn from_outcome(outcome: &NewtonOutcome) -> Self {
        let condition = outcome.condition();
        Self {
            termination: condition.to_string(),
            optimal: condition.is_optimal(),
            iterations: outcome.iterations,
            residual_norm: outcome.residual_norm,
        }
    }
}

/// A stream state snapshot with engineering units spelled out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamSummary {
    pub flow_m3_per_day: Real,
    pub temperature_k: Real,
    pub pressure_pa: Real,
    /// Component concentrations keyed by symbol, in the component's own
    /// basis (kg COD/m^3 or kg N/m^3).
    pub concentrations: BTreeMap<String, Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alkalinity_kmol_per_m3: Option<Real>,
}

impl StreamSummary {
    /// Convert an SI volumetric flow (m^3/s) into the customary daily
    /// basis for display.
    pub fn flow_to_daily(flow_m3_per_s: Real) -> Real {
        flow_m3_per_s * SECONDS_PER_DAY
    }
}

/// The full result of one translation: solve summary plus both stream
/// states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationReport {
    pub block: String,
    pub solve: SolveReport,
    pub inlet: StreamSummary,
    pub outlet: StreamSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_conversion_to_daily() {
        assert_eq!(StreamSummary::flow_to_daily(1.0), 86_400.0);
    }
}
