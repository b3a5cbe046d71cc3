//! Per-user session state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::ENTRY_STEP_ID;
use crate::error::FlowError;

/// Generated summary texts keyed by SummaryID.
///
/// Entries are written at most once and never evicted within a session; a
/// later `put` for an existing id is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryCache(BTreeMap<String, String>);

impl SummaryCache {
    pub fn contains(&self, summary_id: &str) -> bool {
        self.0.contains_key(summary_id)
    }

    pub fn get(&self, summary_id: &str) -> Option<&str> {
        self.0.get(summary_id).map(String::as_str)
    }

    /// Store `text` for `summary_id` unless an entry already exists.
    /// Returns whether the entry was written.
    pub fn put(&mut self, summary_id: impl Into<String>, text: impl Into<String>) -> bool {
        match self.0.entry(summary_id.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(text.into());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for SummaryCache {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }
}

/// Everything one user has done in the wizard so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub project_name: String,
    pub current_step: String,
    /// Answers keyed by StepID. Entries are overwritten on revisit, never removed.
    pub answers: BTreeMap<String, String>,
    pub generated_summaries: SummaryCache,
    /// Transient: a project has been started or a checkpoint loaded.
    pub started: bool,
    /// Transient: the one-time intro notice has been shown.
    pub intro_displayed: bool,
    /// Transient: model chosen for summaries in this session, if any.
    pub model_override: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            current_step: ENTRY_STEP_ID.to_string(),
            answers: BTreeMap::new(),
            generated_summaries: SummaryCache::default(),
            started: false,
            intro_displayed: false,
            model_override: None,
        }
    }
}

impl SessionState {
    /// Begin a fresh project at the entry step.
    pub fn start(project_name: &str) -> Result<Self, FlowError> {
        let project_name = project_name.trim();
        if project_name.is_empty() {
            return Err(FlowError::EmptyProjectName);
        }
        Ok(Self {
            project_name: project_name.to_string(),
            started: true,
            ..Self::default()
        })
    }

    /// Drop everything, returning to the not-started state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn answer(&self, step_id: &str) -> Option<&str> {
        self.answers.get(step_id).map(String::as_str)
    }

    /// Record an answer (trimmed) for a step.
    pub fn record_answer(&mut self, step_id: &str, answer: &str) {
        self.answers
            .insert(step_id.to_string(), answer.trim().to_string());
    }

    /// Set or clear (with a blank value) the per-session model override.
    pub fn set_model_override(&mut self, model: Option<&str>) {
        self.model_override = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from);
    }

    /// Mark the intro notice as shown; returns `true` only the first time.
    pub fn take_intro(&mut self) -> bool {
        if self.intro_displayed {
            false
        } else {
            self.intro_displayed = true;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_not_started() {
        let s = SessionState::default();
        assert!(!s.started);
        assert!(!s.intro_displayed);
        assert_eq!(s.current_step, "G1");
        assert!(s.answers.is_empty());
        assert!(s.generated_summaries.is_empty());
    }

    #[test]
    fn start_trims_and_requires_project_name() {
        let s = SessionState::start("  Mijn project ").unwrap();
        assert_eq!(s.project_name, "Mijn project");
        assert!(s.started);
        assert_eq!(s.current_step, "G1");

        assert!(matches!(
            SessionState::start("   "),
            Err(FlowError::EmptyProjectName)
        ));
    }

    #[test]
    fn cache_put_never_overwrites() {
        let mut cache = SummaryCache::default();
        assert!(cache.put("S1", "eerste"));
        assert!(!cache.put("S1", "tweede"));
        assert_eq!(cache.get("S1"), Some("eerste"));
        assert!(cache.contains("S1"));
        assert!(!cache.contains("S2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn record_answer_trims_and_overwrites() {
        let mut s = SessionState::start("p").unwrap();
        s.record_answer("G1", "  eerste  ");
        assert_eq!(s.answer("G1"), Some("eerste"));
        s.record_answer("G1", "tweede");
        assert_eq!(s.answer("G1"), Some("tweede"));
        assert_eq!(s.answers.len(), 1);
    }

    #[test]
    fn intro_is_taken_once() {
        let mut s = SessionState::start("p").unwrap();
        assert!(s.take_intro());
        assert!(!s.take_intro());
    }

    #[test]
    fn blank_model_override_clears() {
        let mut s = SessionState::default();
        s.set_model_override(Some(" gpt-4o "));
        assert_eq!(s.model_override.as_deref(), Some("gpt-4o"));
        s.set_model_override(Some("  "));
        assert!(s.model_override.is_none());
    }

    #[test]
    fn reset_returns_to_default() {
        let mut s = SessionState::start("p").unwrap();
        s.record_answer("G1", "a");
        s.generated_summaries.put("S1", "x");
        s.reset();
        assert_eq!(s, SessionState::default());
    }
}
