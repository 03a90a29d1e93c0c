use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LimiterError {
    #[error("Concurrency limiter is closed")]
    Closed,
}

/// Bounds how many scheduled tasks may run at once.
///
/// Admission is FIFO among waiters. A slot is held for exactly the lifetime of the task: it is
/// returned when the task completes, panics, or is dropped mid-flight, so a misbehaving task can
/// never shrink capacity. Clones share the same slots.
#[derive(Clone, Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyLimiter {
    pub fn new(limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Wait for a free slot, run `task`, and release the slot once it settles.
    pub async fn schedule<F>(&self, task: F) -> Result<F::Output, LimiterError>
    where
        F: Future,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| LimiterError::Closed)?;
        trace!("Slot acquired, {} left", self.semaphore.available_permits());

        Ok(task.await)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Reject all current and future waiters. Tasks already running keep their slot.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }
}
