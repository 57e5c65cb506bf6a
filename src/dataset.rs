//! Tabular dataset loading

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::TermRow;
use crate::prompts::TemplateKind;

/// Column holding the source-language example sentence
const SENTENCE_COLUMN: &str = "IT EXAMPLE";
/// Column holding the source-language term
const TERM_COLUMN: &str = "IT TERM";

/// Load the rows of a `;`-separated LegISTyr dataset.
///
/// Header and field whitespace is trimmed; the options column depends on the
/// template. Row order defines the 0-based index preserved end-to-end.
pub fn load_rows(path: &Path, template: TemplateKind) -> Result<Vec<TermRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| TranslationError::FileError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let headers = reader.headers()?.clone();
    let sentence_idx = column_index(&headers, SENTENCE_COLUMN, path)?;
    let term_idx = column_index(&headers, TERM_COLUMN, path)?;
    let options_idx = column_index(&headers, template.options_column(), path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(TermRow {
            sentence: record.get(sentence_idx).unwrap_or_default().to_string(),
            term: record.get(term_idx).unwrap_or_default().to_string(),
            options: record.get(options_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(rows)
}

/// Position of a named column in the header row
fn column_index(headers: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| TranslationError::FileError {
            path: path.display().to_string(),
            message: format!("missing column '{name}'"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_dataset(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LegISTyr__test.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_homonyms_dataset() {
        let (_dir, path) = write_dataset(
            "IT EXAMPLE; IT TERM ;OPTIONS\n\
             Il comune delibera.;comune;Gemeinde|Kommune\n\
             La giunta approva.;giunta;Ausschuss|Landesregierung\n",
        );

        let rows = load_rows(&path, TemplateKind::Homonyms).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sentence, "Il comune delibera.");
        assert_eq!(rows[0].term, "comune");
        assert_eq!(rows[0].options, "Gemeinde|Kommune");
        assert_eq!(rows[1].term, "giunta");
    }

    #[test]
    fn test_template_selects_options_column() {
        let (_dir, path) = write_dataset(
            "IT EXAMPLE;IT TERM;OPTIONS;TARGET HYPOTHESIS (DE SOUTH TYROL)\n\
             Il comune delibera.;comune;ignored;Gemeinde\n",
        );

        let rows = load_rows(&path, TemplateKind::SimpleTerms).unwrap();

        assert_eq!(rows[0].options, "Gemeinde");
    }

    #[test]
    fn test_missing_column_is_reported() {
        let (_dir, path) = write_dataset("IT EXAMPLE;IT TERM\nfrase;termine\n");

        let err = load_rows(&path, TemplateKind::Homonyms).unwrap_err();

        match err {
            TranslationError::FileError { message, .. } => {
                assert!(message.contains("OPTIONS"));
            }
            other => panic!("expected file error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_rows(Path::new("data/LegISTyr__absent.csv"), TemplateKind::Gender)
            .unwrap_err();

        assert!(matches!(err, TranslationError::FileError { .. }));
    }
}
