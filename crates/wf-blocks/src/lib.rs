//! wf-blocks: unit model blocks for wastewater flowsheets.
//!
//! Currently provides the ADM1-to-ASM1 stream translator, the block that
//! connects an anaerobic digester model to an activated sludge train by
//! mapping component bases across the boundary.

pub mod config;
pub mod error;
pub mod report;
pub mod translator_adm1_asm1;

pub use config::TranslatorConfig;
pub use error::{BlockError, BlockResult};
pub use report::{SolveReport, StreamSummary, TranslationReport};
pub use translator_adm1_asm1::{
    BIOMASS_GROUPS, CONSTRAINT_NAMES, CONSTRAINTS_PER_TIME, InitializeOutcome,
    READILY_BIODEGRADABLE, SLOWLY_BIODEGRADABLE, TRACE_CONCENTRATION, TranslatorAdm1Asm1,
    TranslatorParams, ZERO_FLOW_COMPONENTS,
};
