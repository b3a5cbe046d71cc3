//! Flow engine: the step state machine.
//!
//! The engine itself is stateless: catalogs and the generator are shared
//! read-only, and every action receives the session it should act on.
//!
//! ```text
//! Question(s) --advance--> write answers[s] --> next(s)
//! Summary(s)  --advance--> next(s)
//! Summary(s)  --generate-> cache[trigger(s)] (once)
//! next(s) empty            terminal, advance reports Finished
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use super::view::{INTRO_NOTICE, RenderedStep, StepView, SummaryView, Transition};
use crate::catalog::{StepCatalog, StepDefinition, StepKind, SummaryCatalog, SummaryDefinition};
use crate::error::{FlowError, Result};
use crate::session::SessionState;
use crate::summary::{SummaryGenerator, build_qa_bundle};

pub struct FlowEngine {
    steps: Arc<StepCatalog>,
    summaries: Arc<SummaryCatalog>,
    generator: Arc<SummaryGenerator>,
}

impl FlowEngine {
    pub fn new(
        steps: Arc<StepCatalog>,
        summaries: Arc<SummaryCatalog>,
        generator: Arc<SummaryGenerator>,
    ) -> Self {
        Self {
            steps,
            summaries,
            generator,
        }
    }

    pub fn summaries(&self) -> &SummaryCatalog {
        &self.summaries
    }

    pub fn generator(&self) -> &SummaryGenerator {
        &self.generator
    }

    /// Resolve the current step, rejecting sessions that were never started.
    fn current_step(&self, session: &SessionState) -> std::result::Result<&StepDefinition, FlowError> {
        if !session.started {
            return Err(FlowError::NotStarted);
        }
        self.steps.lookup(&session.current_step)
    }

    /// Build the view for the current step.
    ///
    /// Consumes the one-time intro notice on success.
    pub fn render(&self, session: &mut SessionState) -> std::result::Result<RenderedStep, FlowError> {
        let step = self.current_step(session)?;
        let next_step_id = step.next_step_id.clone();
        let can_advance = next_step_id.is_some();

        let view = match &step.kind {
            StepKind::Question => StepView::Question {
                step_id: step.id.clone(),
                question: step.question_text.clone(),
                answer: session.answer(&step.id).unwrap_or_default().to_string(),
                next_step_id,
                can_advance,
            },
            StepKind::Summary => StepView::Summary {
                step_id: step.id.clone(),
                next_step_id,
                can_advance,
                summary: self.summary_view(step, session),
            },
            StepKind::Unrecognized(kind) => {
                return Err(FlowError::UnknownStepKind {
                    step_id: step.id.clone(),
                    kind: kind.clone(),
                });
            }
        };

        let intro = session.take_intro().then_some(INTRO_NOTICE);
        Ok(RenderedStep {
            project_name: session.project_name.clone(),
            intro,
            step: view,
        })
    }

    fn summary_view(&self, step: &StepDefinition, session: &SessionState) -> SummaryView {
        let Some(summary_id) = step.trigger_summary_id.as_deref() else {
            return SummaryView::NoTrigger;
        };
        let summary = match self.summaries.lookup(summary_id) {
            Ok(summary) => summary,
            Err(e) => {
                return SummaryView::Unresolved {
                    summary_id: summary_id.to_string(),
                    message: e.to_string(),
                };
            }
        };
        match session.generated_summaries.get(&summary.id) {
            Some(text) => SummaryView::Cached {
                summary_id: summary.id.clone(),
                text: text.to_string(),
            },
            None => SummaryView::Pending {
                summary_id: summary.id.clone(),
                category_hint: summary.category_hint.clone(),
            },
        }
    }

    /// Move past the current step.
    ///
    /// On a question step the trimmed answer is written first, even if the
    /// move then fails. `None` keeps whatever was recorded before (the
    /// prefill), so skipping past a question never erases its answer. Summary steps never require a
    /// generated summary. The next step is resolved here; an unknown id
    /// leaves the session where it is.
    pub fn advance(
        &self,
        session: &mut SessionState,
        answer: Option<&str>,
    ) -> std::result::Result<Transition, FlowError> {
        let step = self.current_step(session)?;

        match &step.kind {
            StepKind::Question => {
                let answer = match answer {
                    Some(answer) => answer.to_string(),
                    None => session.answer(&step.id).unwrap_or_default().to_string(),
                };
                session.record_answer(&step.id, &answer);
            }
            StepKind::Summary => {}
            StepKind::Unrecognized(kind) => {
                return Err(FlowError::UnknownStepKind {
                    step_id: step.id.clone(),
                    kind: kind.clone(),
                });
            }
        }

        let Some(next_step_id) = step.next_step_id.as_deref() else {
            debug!(step_id = %step.id, "Reached terminal step");
            return Ok(Transition::Finished {
                step_id: step.id.clone(),
            });
        };
        let next = self.steps.lookup(next_step_id)?;

        session.current_step = next.id.clone();
        debug!(from = %step.id, to = %next.id, "Advanced step");
        Ok(Transition::Moved {
            from: step.id.clone(),
            to: next.id.clone(),
        })
    }

    /// Generate (or return the cached) summary for the current summary step.
    ///
    /// The provider is called at most once per summary id per session; the
    /// cache is written only when the call succeeds.
    pub async fn generate(&self, session: &mut SessionState) -> Result<String> {
        let step = self.current_step(session)?;
        match &step.kind {
            StepKind::Summary => {}
            StepKind::Question => return Err(FlowError::NotASummaryStep(step.id.clone()).into()),
            StepKind::Unrecognized(kind) => {
                return Err(FlowError::UnknownStepKind {
                    step_id: step.id.clone(),
                    kind: kind.clone(),
                }
                .into());
            }
        }

        let summary_id = step
            .trigger_summary_id
            .as_deref()
            .ok_or_else(|| FlowError::NoSummaryTrigger(step.id.clone()))?;
        let summary = self.summaries.lookup(summary_id)?;

        if let Some(cached) = session.generated_summaries.get(&summary.id) {
            debug!(summary_id = %summary.id, "Summary already cached");
            return Ok(cached.to_string());
        }

        let bundle = self.qa_bundle(session, summary);
        let text = self
            .generator
            .generate(
                &summary.category_hint,
                &bundle,
                session.model_override.as_deref(),
            )
            .await?;

        session.generated_summaries.put(summary.id.clone(), text.clone());
        info!(summary_id = %summary.id, chars = text.len(), "Summary cached");
        Ok(text)
    }

    /// The Q/A bundle a summary would be generated from right now.
    pub fn qa_bundle(&self, session: &SessionState, summary: &SummaryDefinition) -> String {
        build_qa_bundle(&self.steps, &session.answers, summary)
    }
}
