//! Core data models for translation runs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message role in a chat prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed task instruction
    System,
    /// Per-row payload
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
        }
    }
}

/// One role/content pair of a chat prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ordered message sequence sent in one completion request.
///
/// Built fresh per row and never mutated after creation.
pub type Prompt = Vec<ChatMessage>;

/// One unit of translatable input, read from the source table.
///
/// Identified by its 0-based position in the table, which is preserved
/// end-to-end for output ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRow {
    /// Source-language example sentence
    pub sentence: String,
    /// Source-language term occurring in the sentence
    pub term: String,
    /// Candidate translation(s) for the term, opaque to this system
    pub options: String,
}

impl TermRow {
    /// Create a row from its three fields
    pub fn new(
        sentence: impl Into<String>,
        term: impl Into<String>,
        options: impl Into<String>,
    ) -> Self {
        Self {
            sentence: sentence.into(),
            term: term.into(),
            options: options.into(),
        }
    }
}

/// Payload of a successful completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Primary answer text, as returned by the model
    pub text: String,
    /// Reasoning trace, if the model exposed one
    pub reasoning: Option<String>,
    /// Upstream completion cost, if reported
    pub cost: Option<f64>,
    /// Reasoning token count, if reported
    pub reasoning_tokens: Option<u64>,
}

/// Outcome of one API call for one row.
///
/// Every row resolves to exactly one outcome; failures are data, not faults.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The row produced a completion
    Success(Completion),
    /// The row failed after retry exhaustion or on a permanent error
    Failure {
        /// Human-readable description of the failure
        error: String,
    },
}

impl RowOutcome {
    /// Create a failure outcome
    pub fn failure(error: impl Into<String>) -> Self {
        RowOutcome::Failure {
            error: error.into(),
        }
    }

    /// Whether this outcome carries a completion
    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Success(_))
    }
}
