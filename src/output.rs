//! Result artifacts: structured CSV and aligned plain text

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::errors::Result;
use crate::core::models::RowOutcome;

/// One record of the structured artifact.
///
/// Failure rows keep their index and serialize with empty cells, so the
/// artifact stays row-aligned with the input table.
#[derive(Debug, Serialize)]
struct OutputRecord<'a> {
    index: usize,
    assistant: Option<&'a str>,
    reasoning: Option<&'a str>,
    cost: Option<f64>,
    reasoning_tokens: Option<u64>,
}

/// Derive the artifact base name from a model identifier.
///
/// `/` is not filesystem-safe and becomes `_`: `openai/gpt-4o-mini` maps to
/// `openai_gpt-4o-mini`.
pub fn model_file_stem(model: &str) -> String {
    model.replace('/', "_")
}

/// Normalize a raw completion for the plain-text artifact: drop `<think>`
/// markers, collapse line breaks to spaces, trim
pub fn clean_translation(raw: &str) -> String {
    raw.replace("<think>", "")
        .replace("</think>", "")
        .replace('\n', " ")
        .replace('\r', " ")
        .trim()
        .to_string()
}

/// Write the structured CSV artifact, one record per row in input order
pub fn write_csv(outcomes: &[RowOutcome], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for (index, outcome) in outcomes.iter().enumerate() {
        let record = match outcome {
            RowOutcome::Success(completion) => OutputRecord {
                index,
                assistant: Some(completion.text.as_str()),
                reasoning: completion.reasoning.as_deref(),
                cost: completion.cost,
                reasoning_tokens: completion.reasoning_tokens,
            },
            RowOutcome::Failure { .. } => OutputRecord {
                index,
                assistant: None,
                reasoning: None,
                cost: None,
                reasoning_tokens: None,
            },
        };
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the plain-text artifact: line N is the cleaned translation of row N,
/// failed rows render as an empty line to preserve alignment
pub fn write_txt(outcomes: &[RowOutcome], path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)?;

    for outcome in outcomes {
        let line = match outcome {
            RowOutcome::Success(completion) => clean_translation(&completion.text),
            RowOutcome::Failure { .. } => String::new(),
        };
        writeln!(file, "{line}")?;
    }

    Ok(())
}

/// Write both artifacts under their output directories, creating the
/// directories if absent; returns the written paths
pub fn write_artifacts(
    outcomes: &[RowOutcome],
    model: &str,
    csv_dir: &Path,
    txt_dir: &Path,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(csv_dir)?;
    fs::create_dir_all(txt_dir)?;

    let stem = model_file_stem(model);
    let csv_path = csv_dir.join(format!("{stem}.csv"));
    let txt_path = txt_dir.join(format!("{stem}.txt"));

    write_csv(outcomes, &csv_path)?;
    write_txt(outcomes, &txt_path)?;

    Ok((csv_path, txt_path))
}
