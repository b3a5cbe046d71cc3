//! Deterministic prompt construction for summaries.

use std::collections::BTreeMap;

use crate::catalog::{StepCatalog, SummaryDefinition};

/// Fixed system instructions for every summary request.
pub const SUMMARY_INSTRUCTIONS: &str = "\
Je bent een neutrale samenvatter voor brainstorm-antwoorden van studenten.
Verzin niets, interpreteer niet, en leg geen nieuwe verbanden.

Gebruik exact dit format:
**Samenvatting (lens: <PromptCategoryHint>)**

1) **Kern** (2–4 zinnen, feitelijk)
2) **Wat kristalliseert** (max 3 bullets)
3) **Open plekken** (max 3 bullets)

Regels:
- Geen oordeel.
- Geen coaching-taal.
- Alleen gebruiken wat letterlijk in de antwoorden staat.
";

/// Stand-in question text for an included id missing from the catalog.
pub const UNKNOWN_QUESTION: &str = "(onbekende vraag)";

/// Stand-in for an absent or blank answer.
pub const NO_ANSWER: &str = "(geen antwoord)";

/// One `"<id> — <question>\nAntwoord: <answer>\n"` block.
pub fn qa_block(step_id: &str, question: &str, answer: &str) -> String {
    format!("{step_id} — {question}\nAntwoord: {answer}\n")
}

/// Q/A bundle for a summary: one block per included step, in definition
/// order, separated by a blank line.
pub fn build_qa_bundle(
    steps: &StepCatalog,
    answers: &BTreeMap<String, String>,
    summary: &SummaryDefinition,
) -> String {
    summary
        .included_step_ids
        .iter()
        .map(|step_id| {
            let question = steps
                .get(step_id)
                .map(|s| s.question_text.as_str())
                .unwrap_or(UNKNOWN_QUESTION);
            let answer = answers
                .get(step_id)
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .unwrap_or(NO_ANSWER);
            qa_block(step_id, question, answer)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// User-side input: the category hint followed by the Q/A bundle.
pub fn summary_input(category_hint: &str, qa_bundle: &str) -> String {
    format!("PromptCategoryHint: {category_hint}\n\nTe gebruiken Q/A:\n{qa_bundle}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StepDefinition, StepKind};

    fn catalog() -> StepCatalog {
        StepCatalog::from_definitions([
            StepDefinition {
                id: "G1".to_string(),
                kind: StepKind::Question,
                question_text: "Name?".to_string(),
                next_step_id: Some("G2".to_string()),
                trigger_summary_id: None,
            },
            StepDefinition {
                id: "G2".to_string(),
                kind: StepKind::Summary,
                question_text: String::new(),
                next_step_id: None,
                trigger_summary_id: Some("S1".to_string()),
            },
            StepDefinition {
                id: "G3".to_string(),
                kind: StepKind::Question,
                question_text: "Doel?".to_string(),
                next_step_id: None,
                trigger_summary_id: None,
            },
        ])
        .unwrap()
    }

    fn summary(ids: &[&str]) -> SummaryDefinition {
        SummaryDefinition {
            id: "S1".to_string(),
            included_step_ids: ids.iter().map(|s| s.to_string()).collect(),
            category_hint: "identity".to_string(),
        }
    }

    #[test]
    fn single_answer_bundle_is_exact() {
        let answers = BTreeMap::from([("G1".to_string(), "Ada".to_string())]);
        let bundle = build_qa_bundle(&catalog(), &answers, &summary(&["G1"]));
        assert_eq!(bundle, "G1 — Name?\nAntwoord: Ada\n");
    }

    #[test]
    fn blocks_are_separated_by_blank_line_in_definition_order() {
        let answers = BTreeMap::from([
            ("G1".to_string(), "Ada".to_string()),
            ("G3".to_string(), "Leren".to_string()),
        ]);
        let bundle = build_qa_bundle(&catalog(), &answers, &summary(&["G3", "G1"]));
        assert_eq!(
            bundle,
            "G3 — Doel?\nAntwoord: Leren\n\nG1 — Name?\nAntwoord: Ada\n"
        );
    }

    #[test]
    fn placeholders_for_unknown_step_and_missing_answers() {
        let answers = BTreeMap::from([("G3".to_string(), "   ".to_string())]);
        let bundle = build_qa_bundle(&catalog(), &answers, &summary(&["X9", "G1", "G3"]));
        assert_eq!(
            bundle,
            "X9 — (onbekende vraag)\nAntwoord: (geen antwoord)\n\n\
             G1 — Name?\nAntwoord: (geen antwoord)\n\n\
             G3 — Doel?\nAntwoord: (geen antwoord)\n"
        );
    }

    #[test]
    fn empty_inclusion_list_gives_empty_bundle() {
        let bundle = build_qa_bundle(&catalog(), &BTreeMap::new(), &summary(&[]));
        assert!(bundle.is_empty());
    }

    #[test]
    fn input_prefixes_hint() {
        let input = summary_input("identity", "G1 — Name?\nAntwoord: Ada\n");
        assert_eq!(
            input,
            "PromptCategoryHint: identity\n\nTe gebruiken Q/A:\nG1 — Name?\nAntwoord: Ada\n"
        );
    }

    #[test]
    fn instructions_name_the_output_format() {
        assert!(SUMMARY_INSTRUCTIONS.contains("**Samenvatting (lens: <PromptCategoryHint>)**"));
        assert!(SUMMARY_INSTRUCTIONS.ends_with("in de antwoorden staat.\n"));
    }
}
