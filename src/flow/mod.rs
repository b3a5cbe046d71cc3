//! Step flow: the state machine that walks a session through the catalog.

pub mod engine;
pub mod view;

pub use engine::FlowEngine;
pub use view::{INTRO_NOTICE, RenderedStep, StepView, SummaryView, Transition};
