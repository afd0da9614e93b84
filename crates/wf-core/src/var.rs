//! Process variables with fix/unfix bookkeeping.

use crate::numeric::Real;

/// A scalar process variable in the equation-oriented sense.
///
/// A variable carries a current value and a fixed flag. Fixed variables are
/// excluded from the free-variable vector handed to the solver, so
/// degrees-of-freedom accounting follows entirely from this flag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Var {
    value: Real,
    fixed: bool,
}

impl Var {
    /// A free variable starting at `value`.
    pub fn new(value: Real) -> Self {
        Self {
            value,
            fixed: false,
        }
    }

    /// A variable fixed at `value`.
    pub fn fixed_at(value: Real) -> Self {
        Self { value, fixed: true }
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn set_value(&mut self, value: Real) {
        self.value = value;
    }

    /// Fix at the current value.
    pub fn fix(&mut self) {
        self.fixed = true;
    }

    /// Set the value and fix there.
    pub fn fix_at(&mut self, value: Real) {
        self.value = value;
        self.fixed = true;
    }

    pub fn unfix(&mut self) {
        self.fixed = false;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Apply an initial guess: sets the value only when the variable is
    /// free. Fixed variables keep the value they were fixed at.
    pub fn guess(&mut self, value: Real) {
        if !self.fixed {
            self.value = value;
        }
    }
}

impl Default for Var {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_and_unfix_round_trip() {
        let mut v = Var::new(3.0);
        assert!(!v.is_fixed());
        v.fix();
        assert!(v.is_fixed());
        assert_eq!(v.value(), 3.0);
        v.unfix();
        assert!(!v.is_fixed());
    }

    #[test]
    fn fix_at_overwrites_value() {
        let mut v = Var::new(1.0);
        v.fix_at(7.5);
        assert!(v.is_fixed());
        assert_eq!(v.value(), 7.5);
    }

    #[test]
    fn guess_skips_fixed_variables() {
        let mut free = Var::new(0.0);
        free.guess(2.0);
        assert_eq!(free.value(), 2.0);

        let mut fixed = Var::fixed_at(5.0);
        fixed.guess(2.0);
        assert_eq!(fixed.value(), 5.0);
    }
}
