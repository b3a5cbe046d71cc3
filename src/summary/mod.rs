//! Summary generation: prompt building plus the provider call.

pub mod generator;
pub mod prompts;

pub use generator::SummaryGenerator;
pub use prompts::{build_qa_bundle, summary_input};
