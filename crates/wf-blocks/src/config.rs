//! Translator block configuration.

use wf_properties::{Adm1PropertyPackage, Asm1PropertyPackage, PackageArgs};

use crate::error::{BlockError, BlockResult};

/// Configuration for the ADM1-to-ASM1 translator block.
///
/// Carries the standard unit model knobs so flowsheet assembly code can
/// treat every block uniformly. A translator holds no material and writes
/// only steady constraints, so `dynamic` and `has_holdup` must stay false.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorConfig {
    /// Whether the block itself is dynamic. Anything but false fails
    /// validation.
    pub dynamic: bool,
    /// Whether the block carries holdup terms. Must be false.
    pub has_holdup: bool,
    /// Whether phase equilibrium is calculated. Neither sludge package
    /// models a second phase; must be false.
    pub has_phase_equilibrium: bool,
    /// Passed through as the `defined_state` flag of the outlet state
    /// blocks: the translation constraints fully determine the outlet.
    pub outlet_state_defined: bool,
    /// Property package for the inlet stream.
    pub inlet_package: Adm1PropertyPackage,
    /// Extra construction arguments for inlet state blocks.
    pub inlet_args: PackageArgs,
    /// Property package for the outlet stream.
    pub outlet_package: Asm1PropertyPackage,
    /// Extra construction arguments for outlet state blocks.
    pub outlet_args: PackageArgs,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            dynamic: false,
            has_holdup: false,
            has_phase_equilibrium: false,
            outlet_state_defined: true,
            inlet_package: Adm1PropertyPackage,
            inlet_args: PackageArgs::new(),
            outlet_package: Asm1PropertyPackage,
            outlet_args: PackageArgs::new(),
        }
    }
}

impl TranslatorConfig {
    /// Reject option combinations the block cannot honour.
    pub fn validate(&self) -> BlockResult<()> {
        if self.dynamic {
            return Err(BlockError::Config {
                what: "translator blocks are steady state; dynamic must be false".to_string(),
            });
        }
        if self.has_holdup {
            return Err(BlockError::Config {
                what: "translator blocks have no holdup; has_holdup must be false".to_string(),
            });
        }
        if self.has_phase_equilibrium {
            return Err(BlockError::Config {
                what: "phase equilibrium is not supported across a translation".to_string(),
            });
        }
        Ok(())
    }
}
