//! wf-flowsheet: flowsheet container and UI interface export.

pub mod flowsheet;
pub mod interface;

pub use flowsheet::Flowsheet;
pub use interface::{ExportedVariable, FlowsheetInterface};
