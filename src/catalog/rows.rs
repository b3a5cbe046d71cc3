//! CSV row normalization.
//!
//! This is the only place where configuration text is trimmed and coerced.
//! Column names are trimmed (and stripped of a UTF-8 BOM), every cell is
//! trimmed, and a column missing from a row reads as empty text. Downstream
//! catalog code can assume clean strings.

use std::collections::HashMap;
use std::io::Read;

use crate::error::ConfigError;

const BOM: char = '\u{feff}';

/// One CSV row keyed by normalized column name.
#[derive(Debug, Clone, Default)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Cell value for `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Read every data row from a CSV source.
///
/// `source_name` is only used to label errors.
pub fn read_rows<R: Read>(reader: R, source_name: &str) -> Result<Vec<Row>, ConfigError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| csv_error(source_name, e))?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.trim().to_string()))
            .collect();
        rows.push(Row { fields });
    }

    Ok(rows)
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches(BOM).trim().to_string()
}

fn csv_error(source_name: &str, err: csv::Error) -> ConfigError {
    ConfigError::Csv {
        source_name: source_name.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_and_values_are_trimmed() {
        let data = " StepID ,  QuestionText \n  G1 ,  Wat wil je maken?  \n";
        let rows = read_rows(data.as_bytes(), "questions").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("StepID"), "G1");
        assert_eq!(rows[0].get("QuestionText"), "Wat wil je maken?");
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let data = "\u{feff}StepID,StepType\nG1,question\n";
        let rows = read_rows(data.as_bytes(), "questions").unwrap();
        assert_eq!(rows[0].get("StepID"), "G1");
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let data = "StepID,StepType,NextStepID\nG1,question\n";
        let rows = read_rows(data.as_bytes(), "questions").unwrap();
        assert_eq!(rows[0].get("StepType"), "question");
        assert_eq!(rows[0].get("NextStepID"), "");
        assert_eq!(rows[0].get("NoSuchColumn"), "");
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let data = "StepID,QuestionText\nG1,\"Wie, wat, waar?\"\n";
        let rows = read_rows(data.as_bytes(), "questions").unwrap();
        assert_eq!(rows[0].get("QuestionText"), "Wie, wat, waar?");
    }
}
