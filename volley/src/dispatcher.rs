use crate::limiter::{ConcurrencyLimiter, LimiterError};
use std::future::Future;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn, Instrument};
use volley_core::RequestOutcome;

/// Failure of the fan-out/join machinery itself, as opposed to an individual request failing.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Request task did not complete: {0}")]
    Join(#[from] JoinError),

    #[error("Could not schedule request: {0}")]
    Limiter(#[from] LimiterError),

    #[error("No outcome recorded for request {0}")]
    MissingOutcome(usize),
}

/// Launches a batch of requests through a shared [`ConcurrencyLimiter`] and waits for all of
/// them.
pub struct BatchDispatcher<T> {
    request: T,
    limiter: ConcurrencyLimiter,
}

impl<T, F> BatchDispatcher<T>
where
    T: Fn() -> F + Send + Sync + 'static,
    F: Future<Output = RequestOutcome> + Send + 'static,
{
    pub fn new(request: T, limiter: ConcurrencyLimiter) -> Self {
        Self { request, limiter }
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Run `size` requests concurrently and return their outcomes in launch order.
    ///
    /// Every launched request is awaited before this returns, including when one of them has
    /// already failed the batch, so no request of this batch is still in flight afterwards.
    pub async fn dispatch_batch(&self, size: usize) -> Result<Vec<RequestOutcome>, DispatchError> {
        let mut set = JoinSet::new();
        for index in 0..size {
            let limiter = self.limiter.clone();
            let request = (self.request)();
            set.spawn(
                async move {
                    let outcome = limiter.schedule(request).await;
                    (index, outcome)
                }
                .in_current_span(),
            );
        }

        let mut outcomes: Vec<Option<RequestOutcome>> = (0..size).map(|_| None).collect();
        let mut failure: Option<DispatchError> = None;
        while let Some(joined) = set.join_next().await {
            let err = match joined {
                Ok((index, Ok(outcome))) => {
                    outcomes[index] = Some(outcome);
                    continue;
                }
                Ok((index, Err(err))) => {
                    debug!("Request {index} could not be scheduled: {err}");
                    DispatchError::from(err)
                }
                Err(err) => {
                    debug!("Request task failed: {err}");
                    DispatchError::from(err)
                }
            };

            // Keep the first failure, but keep joining so nothing outlives the batch.
            if failure.is_none() {
                failure = Some(err);
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| outcome.ok_or(DispatchError::MissingOutcome(index)))
            .collect()
    }
}
