//! Simulation time domain.

use crate::error::{WfError, WfResult};
use crate::numeric::Real;

/// Ordered set of simulation time points.
///
/// Steady-state flowsheets use a single point at zero. Dynamic property
/// packages built on the same interfaces index their state blocks by
/// position in this set, one block per point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSet {
    points: Vec<Real>,
}

impl TimeSet {
    /// The steady-state domain: a single time point at 0.0.
    pub fn steady_state() -> Self {
        Self { points: vec![0.0] }
    }

    /// Build from explicit points. Points must be finite and strictly
    /// increasing, and at least one is required.
    pub fn from_points(points: Vec<Real>) -> WfResult<Self> {
        if points.is_empty() {
            return Err(WfError::InvalidArgument {
                what: "time set requires at least one point".to_string(),
            });
        }
        for (i, &t) in points.iter().enumerate() {
            if !t.is_finite() {
                return Err(WfError::NonFinite {
                    what: format!("time point {i}"),
                    value: t,
                });
            }
            if i > 0 && t <= points[i - 1] {
                return Err(WfError::InvalidArgument {
                    what: format!("time points must be strictly increasing at index {i}"),
                });
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Real] {
        &self.points
    }

    /// Iterate over time indices, the key used by state blocks.
    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.points.len()
    }
}

impl Default for TimeSet {
    fn default() -> Self {
        Self::steady_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_state_has_one_point_at_zero() {
        let t = TimeSet::steady_state();
        assert_eq!(t.len(), 1);
        assert_eq!(t.points(), &[0.0]);
    }

    #[test]
    fn from_points_accepts_increasing() {
        let t = TimeSet::from_points(vec![0.0, 0.5, 2.0]).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn from_points_rejects_empty() {
        assert!(TimeSet::from_points(vec![]).is_err());
    }

    #[test]
    fn from_points_rejects_non_increasing() {
        assert!(TimeSet::from_points(vec![0.0, 0.0]).is_err());
        assert!(TimeSet::from_points(vec![1.0, 0.5]).is_err());
    }

    #[test]
    fn from_points_rejects_nan() {
        assert!(TimeSet::from_points(vec![0.0, f64::NAN]).is_err());
    }
}
