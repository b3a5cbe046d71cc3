//! Summary mapping catalog: which answers feed which summary.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::rows::{Row, read_rows};
use crate::error::{ConfigError, FlowError};

mod columns {
    pub const SUMMARY_ID: &str = "SummaryID";
    pub const QUESTION_IDS_INCLUDED: &str = "QuestionIDsIncluded";
    pub const PROMPT_CATEGORY_HINT: &str = "PromptCategoryHint";
}

/// Separator used in the QuestionIDsIncluded column.
pub const INCLUDED_IDS_DELIMITER: char = '|';

/// One row of the summary mappings sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDefinition {
    pub id: String,
    /// Steps whose answers go into the prompt, in prompt order. Duplicates are kept.
    pub included_step_ids: Vec<String>,
    pub category_hint: String,
}

impl SummaryDefinition {
    fn from_row(row: &Row) -> Self {
        Self {
            id: row.get(columns::SUMMARY_ID).to_string(),
            included_step_ids: split_included_ids(row.get(columns::QUESTION_IDS_INCLUDED)),
            category_hint: row.get(columns::PROMPT_CATEGORY_HINT).to_string(),
        }
    }
}

/// Split a `|`-joined id list, dropping empty tokens and keeping order.
pub fn split_included_ids(raw: &str) -> Vec<String> {
    raw.split(INCLUDED_IDS_DELIMITER)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

/// Immutable SummaryID → SummaryDefinition mapping.
#[derive(Debug, Clone, Default)]
pub struct SummaryCatalog {
    summaries: HashMap<String, SummaryDefinition>,
}

impl SummaryCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let rows = read_rows(reader, "summary mappings")?;
        Ok(Self::from_definitions(
            rows.iter().map(SummaryDefinition::from_row),
        ))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), summaries = catalog.len(), "Loaded summary mappings");
        Ok(catalog)
    }

    /// Build from typed definitions; blank ids are skipped, repeats keep the last.
    pub fn from_definitions(definitions: impl IntoIterator<Item = SummaryDefinition>) -> Self {
        let mut summaries = HashMap::new();
        for definition in definitions {
            if definition.id.is_empty() {
                continue;
            }
            let id = definition.id.clone();
            if summaries.insert(id.clone(), definition).is_some() {
                warn!(summary_id = %id, "Duplicate SummaryID in summary mappings, keeping the last row");
            }
        }
        Self { summaries }
    }

    pub fn get(&self, summary_id: &str) -> Option<&SummaryDefinition> {
        self.summaries.get(summary_id.trim())
    }

    pub fn lookup(&self, summary_id: &str) -> Result<&SummaryDefinition, FlowError> {
        self.get(summary_id)
            .ok_or_else(|| FlowError::SummaryNotFound(summary_id.trim().to_string()))
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_and_drops_empty_tokens() {
        assert_eq!(
            split_included_ids(" G1 | G2 ||G3| "),
            vec!["G1", "G2", "G3"]
        );
        assert!(split_included_ids("").is_empty());
        assert!(split_included_ids(" | | ").is_empty());
    }

    #[test]
    fn split_keeps_order_and_duplicates() {
        assert_eq!(split_included_ids("G3|G1|G3"), vec!["G3", "G1", "G3"]);
    }

    #[test]
    fn loads_mappings() {
        let data = "\
SummaryID , QuestionIDsIncluded , PromptCategoryHint
S1,G1|G2,identiteit
S2,G3,  doelgroep
";
        let catalog = SummaryCatalog::from_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let s1 = catalog.lookup("S1").unwrap();
        assert_eq!(s1.included_step_ids, vec!["G1", "G2"]);
        assert_eq!(s1.category_hint, "identiteit");
        assert_eq!(catalog.lookup("S2").unwrap().category_hint, "doelgroep");
    }

    #[test]
    fn unknown_summary_is_not_found() {
        let catalog = SummaryCatalog::default();
        assert!(catalog.is_empty());
        let err = catalog.lookup("S9").unwrap_err();
        assert!(matches!(err, FlowError::SummaryNotFound(ref id) if id == "S9"));
    }

    #[test]
    fn duplicate_ids_keep_the_last_row() {
        let data = "SummaryID,QuestionIDsIncluded,PromptCategoryHint\nS1,G1,a\nS1,G2,b\n";
        let catalog = SummaryCatalog::from_reader(data.as_bytes()).unwrap();
        let s1 = catalog.lookup("S1").unwrap();
        assert_eq!(s1.included_step_ids, vec!["G2"]);
        assert_eq!(s1.category_hint, "b");
    }
}
