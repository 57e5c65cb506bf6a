//! Concurrent request dispatch with bounded parallelism

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::core::client::CompletionClient;
use crate::core::models::{Prompt, RowOutcome};

/// Receives one advancement signal per completed row.
///
/// Passed explicitly into the dispatcher so progress rendering stays out of
/// the dispatch loop.
pub trait ProgressSink: Send + Sync {
    /// Record one completed row, success or failure
    fn advance(&self);
}

impl ProgressSink for indicatif::ProgressBar {
    fn advance(&self) {
        self.inc(1);
    }
}

/// Sink for callers that do not track progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self) {}
}

/// Fans prompts out against a fixed concurrency budget.
///
/// At most `max_concurrent` client calls are in flight at any time; excess
/// rows wait on the gate. Completion order is unconstrained, result
/// placement is by row index.
pub struct Dispatcher {
    client: Arc<dyn CompletionClient>,
    semaphore: Arc<Semaphore>,
}

impl Dispatcher {
    /// Create a dispatcher admitting at most `max_concurrent` in-flight calls
    pub fn new(client: Arc<dyn CompletionClient>, max_concurrent: usize) -> Self {
        Self {
            client,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Resolve every prompt to exactly one outcome, in input order.
    ///
    /// One row's failure never cancels or blocks sibling rows; the call
    /// returns only when all rows have resolved.
    pub async fn run(&self, prompts: Vec<Prompt>, progress: &dyn ProgressSink) -> Vec<RowOutcome> {
        let total = prompts.len();
        let mut tasks = JoinSet::new();

        for (index, prompt) in prompts.into_iter().enumerate() {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&self.semaphore);

            tasks.spawn(async move {
                // The semaphore is never closed during a run.
                let _permit = semaphore.acquire_owned().await.unwrap();
                let outcome = client.complete(&prompt).await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<RowOutcome>> = vec![None; total];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    slots[index] = Some(outcome);
                }
                Err(e) => {
                    warn!("Worker task failed: {}", e);
                }
            }
            progress.advance();
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| RowOutcome::failure("worker task aborted")))
            .collect()
    }
}
