//! wf-properties: component bases and state blocks for wastewater
//! treatment models.
//!
//! Two property packages are provided: the Anaerobic Digestion Model
//! no. 1 (24 components) and the Activated Sludge Model no. 1
//! (12 components plus alkalinity). Unit models interact with them through
//! the [`package::PropertyPackage`] and [`package::StateBlock`] traits.

pub mod adm1;
pub mod asm1;
pub mod error;
pub mod package;

pub use adm1::{Adm1Component, Adm1PropertyPackage, Adm1State};
pub use asm1::{Asm1Component, Asm1PropertyPackage, Asm1State};
pub use error::{PropertyError, PropertyResult};
pub use package::{PackageArgs, PropertyPackage, StateBlock, StateFlags};
