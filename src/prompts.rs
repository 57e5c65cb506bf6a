//! Prompt templates for the LegISTyr source datasets
//!
//! Each source dataset has one template: a fixed system instruction carrying
//! the row's terminological constraint, plus a user message with the sentence
//! to translate. The template also decides which dataset column holds the
//! candidate translations.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslationError;
use crate::core::models::{ChatMessage, Prompt, TermRow};

/// Shared preamble of every system instruction
const SYSTEM_PREAMBLE: &str = "You are a German translator based in South-Tyrol and this is a \
     translation task. You are tasked to translate a legal sentence from Italian into \
     South-Tyrolean German. South-Tyrolean German is a standard variety of German. \
     There are terminological constraints you must adhere to: ";

/// Shared closing of every system instruction
const SYSTEM_CLOSING: &str = " You must output only the translated text without any explanation, \
     enclosing it in '<>' symbols. This is the text to be translated into German:";

/// Named prompt template, one per source dataset.
///
/// A closed enumeration: an unknown source name is a configuration error at
/// startup, not a runtime lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Ambiguous terms with a closed list of admissible translations
    Homonyms,
    /// Terms with a single target hypothesis
    SimpleTerms,
    /// Abbreviations with their expanded target form
    Abbreviations,
    /// Terms whose translation must carry the correct gender-marked form
    Gender,
}

impl TemplateKind {
    /// Dataset column holding the candidate translations for this template
    pub fn options_column(&self) -> &'static str {
        match self {
            TemplateKind::Homonyms | TemplateKind::Gender => "OPTIONS",
            TemplateKind::SimpleTerms | TemplateKind::Abbreviations => {
                "TARGET HYPOTHESIS (DE SOUTH TYROL)"
            }
        }
    }

    /// Build the prompt for one row.
    ///
    /// Pure and side-effect-free; the same row always yields the same prompt.
    pub fn build(&self, row: &TermRow) -> Prompt {
        let constraint = match self {
            TemplateKind::Homonyms => format!(
                "{} can be translated with only one of these terms: {}.",
                row.term, row.options
            ),
            TemplateKind::SimpleTerms => {
                format!("{} must be translated with {}.", row.term, row.options)
            }
            TemplateKind::Abbreviations => format!(
                "The abbreviation {} must be translated with {}.",
                row.term, row.options
            ),
            TemplateKind::Gender => format!(
                "{} must be translated with the correctly gendered form among these: {}.",
                row.term, row.options
            ),
        };

        vec![
            ChatMessage::system(format!("{SYSTEM_PREAMBLE}{constraint}{SYSTEM_CLOSING}")),
            ChatMessage::user(format!("<{}>. German: ", row.sentence)),
        ]
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Homonyms => write!(f, "homonyms"),
            TemplateKind::SimpleTerms => write!(f, "simple_terms"),
            TemplateKind::Abbreviations => write!(f, "abbreviations"),
            TemplateKind::Gender => write!(f, "gender"),
        }
    }
}

impl FromStr for TemplateKind {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homonyms" => Ok(TemplateKind::Homonyms),
            "simple_terms" => Ok(TemplateKind::SimpleTerms),
            "abbreviations" => Ok(TemplateKind::Abbreviations),
            "gender" => Ok(TemplateKind::Gender),
            other => Err(TranslationError::ConfigError {
                message: format!(
                    "no prompt template for source '{other}'. \
                     Available sources: homonyms, simple_terms, abbreviations, gender"
                ),
            }),
        }
    }
}

/// Build the prompts for all rows, in input order
pub fn build_prompts(rows: &[TermRow], template: TemplateKind) -> Vec<Prompt> {
    rows.iter().map(|row| template.build(row)).collect()
}
