//! Socrates: a CSV-driven brainstorm wizard with checkpointing and AI summaries.

pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod llm;
pub mod routes;
pub mod session;
pub mod summary;
