use super::Sink;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use volley_core::{BatchResult, RunSummary};

/// Reports progress through `tracing`: one line per batch, optionally one per request, and the
/// final summary.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    per_request: bool,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self { per_request: true }
    }

    /// Only report batches and the summary.
    pub fn quiet(mut self) -> Self {
        self.per_request = false;
        self
    }
}

impl Sink for LogSink {
    fn on_batch_complete(&mut self, batch: &BatchResult) {
        if batch.failed {
            error!(
                "Batch {} failed after {:?} ({} requests lost)",
                batch.number(),
                batch.duration,
                batch.size
            );
            return;
        }

        info!("Batch {} finished in {:?}", batch.number(), batch.duration);

        if !self.per_request {
            return;
        }

        for (i, outcome) in batch.outcomes.iter().enumerate() {
            match (outcome.failure, &outcome.detail) {
                (Some(failure), Some(detail)) => warn!(
                    "Request {}, Status:{}, time:{:?} ({failure}: {detail})",
                    i + 1,
                    outcome.status,
                    outcome.elapsed
                ),
                (Some(failure), None) => warn!(
                    "Request {}, Status:{}, time:{:?} ({failure})",
                    i + 1,
                    outcome.status,
                    outcome.elapsed
                ),
                (None, _) => info!(
                    "Request {}, Status:{}, time:{:?}",
                    i + 1,
                    outcome.status,
                    outcome.elapsed
                ),
            }
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        info!("Run complete. {summary}");
    }
}
