//! Step catalog: the wizard's steps keyed by StepID.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::rows::{Row, read_rows};
use crate::error::{ConfigError, FlowError};

/// Every session starts here; the catalog refuses to load without it.
pub const ENTRY_STEP_ID: &str = "G1";

mod columns {
    pub const STEP_ID: &str = "StepID";
    pub const STEP_TYPE: &str = "StepType";
    pub const QUESTION_TEXT: &str = "QuestionText";
    pub const NEXT_STEP_ID: &str = "NextStepID";
    pub const TRIGGER_SUMMARY_ID: &str = "TriggerSummaryID";
}

/// What a step does when it is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    Question,
    Summary,
    /// A StepType value this wizard does not know. Kept so the error surfaces
    /// only when the step is actually reached.
    Unrecognized(String),
}

impl StepKind {
    /// Parse a StepType cell (case-insensitive).
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "question" => Self::Question,
            "summary" => Self::Summary,
            _ => Self::Unrecognized(lowered),
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Question => write!(f, "question"),
            Self::Summary => write!(f, "summary"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// One row of the questions sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: String,
    pub kind: StepKind,
    pub question_text: String,
    /// `None` marks a terminal step.
    pub next_step_id: Option<String>,
    pub trigger_summary_id: Option<String>,
}

impl StepDefinition {
    fn from_row(row: &Row) -> Self {
        Self {
            id: row.get(columns::STEP_ID).to_string(),
            kind: StepKind::parse(row.get(columns::STEP_TYPE)),
            question_text: row.get(columns::QUESTION_TEXT).to_string(),
            next_step_id: non_empty(row.get(columns::NEXT_STEP_ID)),
            trigger_summary_id: non_empty(row.get(columns::TRIGGER_SUMMARY_ID)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_step_id.is_none()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Immutable StepID → StepDefinition mapping, loaded once at startup.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    steps: HashMap<String, StepDefinition>,
}

impl StepCatalog {
    /// Load the questions sheet from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let rows = read_rows(reader, "questions")?;
        Self::from_definitions(rows.iter().map(StepDefinition::from_row))
    }

    /// Load the questions sheet from a file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), steps = catalog.len(), "Loaded questions catalog");
        Ok(catalog)
    }

    /// Build a catalog from already-typed definitions.
    ///
    /// Definitions with an empty id are skipped. A repeated id replaces the
    /// earlier definition and is logged.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = StepDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut steps = HashMap::new();
        for definition in definitions {
            if definition.id.is_empty() {
                continue;
            }
            let id = definition.id.clone();
            if steps.insert(id.clone(), definition).is_some() {
                warn!(step_id = %id, "Duplicate StepID in questions catalog, keeping the last row");
            }
        }

        if !steps.contains_key(ENTRY_STEP_ID) {
            return Err(ConfigError::MissingEntryStep(ENTRY_STEP_ID.to_string()));
        }

        Ok(Self { steps })
    }

    pub fn get(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.get(step_id.trim())
    }

    /// Resolve a step, reporting an unknown id as `StepNotFound`.
    pub fn lookup(&self, step_id: &str) -> Result<&StepDefinition, FlowError> {
        self.get(step_id)
            .ok_or_else(|| FlowError::StepNotFound(step_id.trim().to_string()))
    }

    pub fn entry_step_id(&self) -> &'static str {
        ENTRY_STEP_ID
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: &str = "\
StepID,StepType,QuestionText,NextStepID,TriggerSummaryID
G1,Question,Wat is je projectnaam?,G2,
G2,question,Voor wie is het?,S-G,
S-G,Summary,,G3,S1
G3,QUESTION,Laatste vraag?,,
";

    #[test]
    fn loads_typed_definitions() {
        let catalog = StepCatalog::from_reader(QUESTIONS.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4);

        let g1 = catalog.lookup("G1").unwrap();
        assert_eq!(g1.kind, StepKind::Question);
        assert_eq!(g1.question_text, "Wat is je projectnaam?");
        assert_eq!(g1.next_step_id.as_deref(), Some("G2"));
        assert!(g1.trigger_summary_id.is_none());

        let summary = catalog.lookup("S-G").unwrap();
        assert_eq!(summary.kind, StepKind::Summary);
        assert_eq!(summary.trigger_summary_id.as_deref(), Some("S1"));

        assert!(catalog.lookup("G3").unwrap().is_terminal());
    }

    #[test]
    fn step_type_is_case_insensitive() {
        assert_eq!(StepKind::parse("Question"), StepKind::Question);
        assert_eq!(StepKind::parse(" SUMMARY "), StepKind::Summary);
        assert_eq!(
            StepKind::parse("Intro"),
            StepKind::Unrecognized("intro".to_string())
        );
        assert_eq!(StepKind::parse(""), StepKind::Unrecognized(String::new()));
    }

    #[test]
    fn missing_entry_step_is_a_config_error() {
        let data = "StepID,StepType\nG2,question\n";
        let err = StepCatalog::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEntryStep(ref id) if id == "G1"));
    }

    #[test]
    fn keys_are_trimmed_and_blank_ids_skipped() {
        let data = "StepID,StepType,QuestionText\n  G1  ,question,Naam?\n   ,question,Weeskind\n";
        let catalog = StepCatalog::from_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("G1").is_some());
        assert!(catalog.get(" G1 ").is_some());
    }

    #[test]
    fn duplicate_ids_keep_the_last_row() {
        let data = "StepID,StepType,QuestionText\nG1,question,Eerste\nG1,question,Tweede\n";
        let catalog = StepCatalog::from_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("G1").unwrap().question_text, "Tweede");
    }

    #[test]
    fn unknown_step_is_not_found() {
        let catalog = StepCatalog::from_reader(QUESTIONS.as_bytes()).unwrap();
        let err = catalog.lookup("Z9").unwrap_err();
        assert!(matches!(err, FlowError::StepNotFound(ref id) if id == "Z9"));
        assert!(err.is_not_found());
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, QUESTIONS.as_bytes()).unwrap();
        let catalog = StepCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.entry_step_id(), "G1");
        assert!(!catalog.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StepCatalog::from_path(Path::new("/nonexistent/questions.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
