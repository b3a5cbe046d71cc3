//! Session state and its portable checkpoint form.

pub mod checkpoint;
pub mod state;

pub use checkpoint::{Checkpoint, ExportDocument, UNNAMED_PROJECT, checkpoint_file_name};
pub use state::{SessionState, SummaryCache};
