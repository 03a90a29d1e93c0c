//! Racing an operation against a timer.
use pin_project::pin_project;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use thiserror::Error;
use tokio::time::{sleep, Sleep};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Deadline of {0:?} elapsed")]
pub struct DeadlineElapsed(pub Duration);

/// Run `op` until it completes or `duration` elapses, whichever happens first.
///
/// When the deadline wins, `op` is dropped along with the returned future, which cancels whatever
/// I/O it had in flight. `op` is always polled before the timer, so an operation that is ready on
/// the same poll as the deadline still counts as completed.
///
/// Must be called from within a Tokio runtime.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use volley::deadline::with_deadline;
///
/// # async fn example() {
/// let res = with_deadline(async { 42 }, Duration::from_millis(100)).await;
/// assert_eq!(res, Ok(42));
/// # }
/// ```
pub fn with_deadline<F: Future>(op: F, duration: Duration) -> Deadline<F> {
    Deadline {
        op,
        sleep: sleep(duration),
        duration,
    }
}

#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub struct Deadline<F> {
    #[pin]
    op: F,
    #[pin]
    sleep: Sleep,
    duration: Duration,
}

impl<F: Future> Future for Deadline<F> {
    type Output = Result<F::Output, DeadlineElapsed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if let Poll::Ready(output) = this.op.poll(cx) {
            return Poll::Ready(Ok(output));
        }

        match this.sleep.poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(DeadlineElapsed(*this.duration))),
            Poll::Pending => Poll::Pending,
        }
    }
}
