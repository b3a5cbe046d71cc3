//! Checkpoint and export documents.
//!
//! A checkpoint is the resumable snapshot of a session (project, position,
//! answers, generated summaries). An export is the final deliverable and only
//! carries the project name and the answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::{SessionState, SummaryCache};
use crate::catalog::ENTRY_STEP_ID;
use crate::error::CheckpointError;

/// Project label used when a checkpoint carries no usable name.
pub const UNNAMED_PROJECT: &str = "Onbenoemd project";

/// Serialized form of a session. Transient flags are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub project_name: String,
    pub current_step: String,
    pub answers: BTreeMap<String, String>,
    pub generated_summaries: SummaryCache,
}

/// Incoming checkpoint; every field may be absent or null.
#[derive(Debug, Deserialize)]
struct RawCheckpoint {
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    current_step: Option<String>,
    #[serde(default)]
    answers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    generated_summaries: Option<BTreeMap<String, String>>,
}

/// Final deliverable: the project and its answers, nothing resumable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub project: String,
    pub answers: BTreeMap<String, String>,
}

pub fn encode(session: &SessionState) -> Checkpoint {
    Checkpoint {
        project_name: session.project_name.clone(),
        current_step: session.current_step.clone(),
        answers: session.answers.clone(),
        generated_summaries: session.generated_summaries.clone(),
    }
}

/// Encode as pretty-printed JSON (non-ASCII text is written as-is).
pub fn to_json(session: &SessionState) -> Result<String, CheckpointError> {
    serde_json::to_string_pretty(&encode(session))
        .map_err(|e| CheckpointError::Malformed(e.to_string()))
}

/// Decode a checkpoint document into a fresh, started session.
///
/// The caller's current session is not touched; replace it only on `Ok`.
pub fn decode(document: &str) -> Result<SessionState, CheckpointError> {
    let raw: RawCheckpoint =
        serde_json::from_str(document).map_err(|e| CheckpointError::Malformed(e.to_string()))?;

    Ok(SessionState {
        project_name: text_or(raw.project_name, UNNAMED_PROJECT),
        current_step: text_or(raw.current_step, ENTRY_STEP_ID),
        answers: raw.answers.unwrap_or_default(),
        generated_summaries: raw.generated_summaries.unwrap_or_default().into(),
        started: true,
        intro_displayed: false,
        model_override: None,
    })
}

fn text_or(value: Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn export(session: &SessionState) -> ExportDocument {
    ExportDocument {
        project: session.project_name.clone(),
        answers: session.answers.clone(),
    }
}

/// Download name for a checkpoint, e.g. `Mijn_project_checkpoint.json`.
pub fn checkpoint_file_name(project_name: &str) -> String {
    let stem = if project_name.is_empty() {
        "project".to_string()
    } else {
        project_name.replace(' ', "_")
    };
    format!("{stem}_checkpoint.json")
}
