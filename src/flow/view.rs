//! What the engine hands to the interactive surface for one render cycle.

use serde::Serialize;

/// One-time notice shown on the first render after a start or resume.
pub const INTRO_NOTICE: &str =
    "Ik stel je één vraag per keer. Af en toe vat ik samen en ga ik door.";

/// A rendered step plus session-level decorations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedStep {
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<&'static str>,
    pub step: StepView,
}

/// The interaction for the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepView {
    Question {
        step_id: String,
        question: String,
        /// Previously recorded answer, used to prefill the input.
        answer: String,
        next_step_id: Option<String>,
        can_advance: bool,
    },
    Summary {
        step_id: String,
        next_step_id: Option<String>,
        can_advance: bool,
        summary: SummaryView,
    },
}

impl StepView {
    /// `false` on terminal steps: no navigation controls are shown.
    pub fn can_advance(&self) -> bool {
        match self {
            Self::Question { can_advance, .. } | Self::Summary { can_advance, .. } => *can_advance,
        }
    }
}

/// State of the summary attached to a summary step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryView {
    /// The step names no summary; it is a plain passthrough.
    NoTrigger,
    /// The step names a summary the mapping sheet does not define.
    Unresolved { summary_id: String, message: String },
    /// Already generated in this session.
    Cached { summary_id: String, text: String },
    /// Not generated yet; `generate` is available.
    Pending {
        summary_id: String,
        category_hint: String,
    },
}

/// Outcome of an `advance` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    Moved { from: String, to: String },
    /// Terminal step: nothing further to move to.
    Finished { step_id: String },
}
