//! Property package and state block interfaces.
//!
//! A property package describes one thermodynamic/component basis (here the
//! anaerobic and activated sludge models) and knows how to construct state
//! blocks for it. A state block is the set of state variables describing one
//! stream at one time point. Unit models talk to both only through the
//! traits in this module.

use std::collections::BTreeMap;

use wf_core::{Real, Var};

use crate::error::{PropertyError, PropertyResult};

/// Extra arguments forwarded to state block construction, keyed by name.
/// Packages reject keys they do not recognise.
pub type PackageArgs = BTreeMap<String, Real>;

/// Record of which variables a `hold_state` call newly fixed, so
/// `release_state` can restore exactly the previous fixed pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateFlags {
    newly_fixed: Vec<usize>,
}

impl StateFlags {
    pub fn len(&self) -> usize {
        self.newly_fixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.newly_fixed.is_empty()
    }
}

/// Check the arguments both sludge packages accept. `has_phase_equilibrium`
/// is recognised for interface compatibility but must be zero: neither
/// package models a second phase.
pub(crate) fn check_common_args(package: &'static str, args: &PackageArgs) -> PropertyResult<()> {
    for (key, value) in args {
        match key.as_str() {
            "has_phase_equilibrium" => {
                if *value != 0.0 {
                    return Err(PropertyError::InvalidArgument {
                        key: key.clone(),
                        reason: "phase equilibrium is not supported by this package".to_string(),
                    });
                }
            }
            _ => {
                return Err(PropertyError::UnknownArgument {
                    package,
                    key: key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Require a finite, nonnegative value (flows and concentrations).
pub(crate) fn check_nonnegative(what: &str, value: Real) -> PropertyResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PropertyError::NonPhysical {
            what: format!("{what} must be nonnegative and finite, got {value}"),
        });
    }
    Ok(())
}

/// Require a finite, strictly positive value (temperature and pressure).
pub(crate) fn check_positive(what: &str, value: Real) -> PropertyResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PropertyError::NonPhysical {
            what: format!("{what} must be positive and finite, got {value}"),
        });
    }
    Ok(())
}

/// A component basis plus the recipe for building its state blocks.
pub trait PropertyPackage {
    type State: StateBlock + Clone;

    /// Package name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Component symbols in canonical order.
    fn component_symbols(&self) -> &'static [&'static str];

    /// Build one state block seeded with the package defaults.
    ///
    /// `defined_state` records whether the caller guarantees the state will
    /// be fully specified from outside (inlets are, outlets usually are
    /// not). `args` must only contain keys the package recognises.
    fn build_state(&self, defined_state: bool, args: &PackageArgs) -> PropertyResult<Self::State>;
}

/// State variables of one stream at one time point.
///
/// Variables are exposed by index in a canonical per-block order, which is
/// also the order the solver packs free variables in.
pub trait StateBlock {
    fn var_count(&self) -> usize;
    fn var(&self, i: usize) -> &Var;
    fn var_mut(&mut self, i: usize) -> &mut Var;
    fn var_name(&self, i: usize) -> &'static str;
    fn is_defined_state(&self) -> bool;

    /// Number of variables not currently fixed.
    fn free_count(&self) -> usize {
        (0..self.var_count())
            .filter(|&i| !self.var(i).is_fixed())
            .count()
    }

    /// Fix every free variable at its current value and record which ones
    /// were newly fixed. Used to pin a block while another is solved.
    fn hold_state(&mut self) -> StateFlags {
        let mut newly_fixed = Vec::new();
        for i in 0..self.var_count() {
            if !self.var(i).is_fixed() {
                self.var_mut(i).fix();
                newly_fixed.push(i);
            }
        }
        StateFlags { newly_fixed }
    }

    /// Undo a previous `hold_state`, unfixing exactly the variables the
    /// hold newly fixed. Variables fixed before the hold stay fixed.
    fn release_state(&mut self, flags: &StateFlags) {
        for &i in &flags.newly_fixed {
            self.var_mut(i).unfix();
        }
    }

    /// Append the values of all free variables, in canonical order.
    fn pack_free(&self, out: &mut Vec<Real>) {
        for i in 0..self.var_count() {
            let v = self.var(i);
            if !v.is_fixed() {
                out.push(v.value());
            }
        }
    }

    /// Write solver values back into the free variables, advancing `cursor`
    /// through `x` in the same order `pack_free` produced.
    fn unpack_free(&mut self, x: &[Real], cursor: &mut usize) {
        for i in 0..self.var_count() {
            if !self.var(i).is_fixed() {
                self.var_mut(i).set_value(x[*cursor]);
                *cursor += 1;
            }
        }
    }

    /// Apply another block of the same layout as an initial guess: free
    /// variables take the source values, fixed variables are untouched.
    fn seed_from(&mut self, src: &Self)
    where
        Self: Sized,
    {
        debug_assert_eq!(self.var_count(), src.var_count());
        for i in 0..self.var_count() {
            let value = src.var(i).value();
            self.var_mut(i).guess(value);
        }
    }
}
