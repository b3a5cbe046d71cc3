//! Read-only configuration catalogs.
//!
//! Both catalogs are built once from CSV at startup and shared behind `Arc`
//! for the life of the process. Nothing mutates them afterwards.

pub mod rows;
pub mod steps;
pub mod summaries;

pub use steps::{ENTRY_STEP_ID, StepCatalog, StepDefinition, StepKind};
pub use summaries::{SummaryCatalog, SummaryDefinition, split_included_ids};
