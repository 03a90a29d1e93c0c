//! Destinations for run progress and the final summary.
//!
//! The engine only calls [`Sink`] methods; how (and whether) anything is written is up to the
//! implementation.
mod json;
mod log;

pub use self::{json::JsonFileSink, log::LogSink};

use volley_core::{BatchResult, RunSummary};

pub trait Sink: Send {
    /// Called once per batch, in batch order, whether the batch failed or not.
    fn on_batch_complete(&mut self, batch: &BatchResult);

    /// Called exactly once, after the last batch.
    fn on_run_complete(&mut self, summary: &RunSummary);
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn on_batch_complete(&mut self, batch: &BatchResult) {
        (**self).on_batch_complete(batch)
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        (**self).on_run_complete(summary)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn on_batch_complete(&mut self, batch: &BatchResult) {
        (**self).on_batch_complete(batch)
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        (**self).on_run_complete(summary)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn on_batch_complete(&mut self, _batch: &BatchResult) {}

    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Fans every event out to each contained sink, in insertion order.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn Sink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for CompositeSink {
    fn on_batch_complete(&mut self, batch: &BatchResult) {
        for sink in &mut self.sinks {
            sink.on_batch_complete(batch);
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        for sink in &mut self.sinks {
            sink.on_run_complete(summary);
        }
    }
}
