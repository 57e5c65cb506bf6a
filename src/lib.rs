//! LegISTyr batch translator
//!
//! Issues batched, concurrency-limited translation requests against an
//! OpenRouter-style chat-completion API, reading source terms from a tabular
//! file and writing an ordered structured artifact plus an aligned
//! plain-text artifact.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod dataset;
pub mod output;
pub mod prompts;

// Re-export key types for convenience
pub use crate::core::{
    client::{CompletionClient, OpenRouterClient},
    config::RunConfig,
    dispatcher::{Dispatcher, NoProgress, ProgressSink},
    errors::TranslationError,
    models::{ChatMessage, Completion, Prompt, Role, RowOutcome, TermRow},
    retry::RetryPolicy,
};
pub use crate::prompts::TemplateKind;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
