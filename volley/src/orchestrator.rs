//! Run logic
use crate::dispatcher::BatchDispatcher;
use crate::limiter::ConcurrencyLimiter;
use crate::sink::Sink;
use crate::stats::RunStats;
use std::future::Future;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, info_span, instrument, trace, warn, Instrument};
use volley_core::{BatchResult, ConfigError, RequestOutcome, RunConfig, RunSummary};

/// Drives a full run: consecutive batches of at most `concurrency` requests, one after the
/// other, folded into a single [`RunSummary`].
///
/// `request` is called once per request and must produce an independent future; for HTTP runs
/// it wraps [`HttpExecutor::execute`](crate::executor::HttpExecutor::execute). Any closure
/// returning a `RequestOutcome` future works, which keeps the orchestrator testable without a
/// network.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use volley::prelude::*;
///
/// # async fn example() -> Result<(), ConfigError> {
/// let config = RunConfig::new("http://127.0.0.1:3002/".parse().unwrap())
///     .total_requests(10)
///     .concurrency(3);
///
/// let orchestrator = Orchestrator::new(config, || async {
///     RequestOutcome::completed(200, Duration::from_millis(1))
/// })?;
///
/// let summary = orchestrator.run(LogSink::new()).await;
/// assert_eq!(summary.batches.len(), 4);
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<T> {
    config: RunConfig,
    dispatcher: BatchDispatcher<T>,
}

impl<T, F> Orchestrator<T>
where
    T: Fn() -> F + Send + Sync + 'static,
    F: Future<Output = RequestOutcome> + Send + 'static,
{
    pub fn new(config: RunConfig, request: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let limiter = ConcurrencyLimiter::new(config.concurrency);

        Ok(Self {
            dispatcher: BatchDispatcher::new(request, limiter),
            config,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        self.dispatcher.limiter()
    }

    /// Attempt every batch exactly once and return the summary.
    ///
    /// A batch whose dispatch fails is recorded as failed and the run moves on; nothing a single
    /// request or batch does can end the run early. The sink sees every batch in order, then
    /// the summary.
    #[instrument(name = "run", skip_all, fields(url = %self.config.target_url))]
    pub async fn run<S: Sink>(self, mut sink: S) -> RunSummary {
        info!("Running with config {}", self.config);

        let start = Instant::now();
        let batch_count = self.config.batch_count();
        let mut stats = RunStats::new(batch_count);

        for (index, size) in self.config.batch_sizes().enumerate() {
            let batch_start = Instant::now();
            let res = self
                .dispatcher
                .dispatch_batch(size)
                .instrument(info_span!("batch", number = index + 1, size))
                .await;
            let duration = batch_start.elapsed();

            let batch = match res {
                Ok(outcomes) => BatchResult::completed(index, outcomes, duration),
                Err(err) => {
                    warn!("Batch {} of {batch_count} failed: {err}", index + 1);
                    BatchResult::failed(index, size, duration)
                }
            };

            sink.on_batch_complete(&batch);
            stats.push(batch);
        }

        let summary = stats.finish(start.elapsed());
        debug!("Run complete");
        sink.on_run_complete(&summary);

        summary
    }
}
