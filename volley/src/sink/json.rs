use super::Sink;
use serde::Serialize;
use serde_with::{serde_as, DurationMilliSeconds, DurationMilliSecondsWithFrac};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use volley_core::{BatchResult, RunSummary};

/// Appends one JSON object per run to a file.
///
/// The file is opened (and created if missing) up front so an unwritable destination is reported
/// before any load is generated. Per-batch events are not written; the summary carries a compact
/// record for every batch.
pub struct JsonFileSink {
    path: PathBuf,
    file: File,
}

impl JsonFileSink {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        let line = serde_json::to_string(&SummaryRecord::from(summary))?;
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }
}

impl Sink for JsonFileSink {
    fn on_batch_complete(&mut self, _batch: &BatchResult) {}

    fn on_run_complete(&mut self, summary: &RunSummary) {
        match self.write_summary(summary) {
            Ok(()) => info!("Summary written to {}", self.path.display()),
            Err(err) => error!("Unable to write summary to {}: {err}", self.path.display()),
        }
    }
}

#[serde_as]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRecord {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    total_run_duration: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    average_request_latency: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    average_batch_duration: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    latency_p50: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    latency_p90: Duration,
    #[serde_as(as = "DurationMilliSecondsWithFrac<f64>")]
    latency_p99: Duration,
    failed_requests: usize,
    error_rate: f64,
    status_counts: BTreeMap<u16, usize>,
    batches: Vec<BatchRecord>,
}

#[serde_as]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRecord {
    batch_number: usize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    batch_duration: Duration,
    request_count: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    error: bool,
}

impl From<&RunSummary> for SummaryRecord {
    fn from(summary: &RunSummary) -> Self {
        Self {
            total_run_duration: summary.total_duration,
            average_request_latency: summary.average_request_latency,
            average_batch_duration: summary.average_batch_duration,
            latency_p50: summary.latency_p50,
            latency_p90: summary.latency_p90,
            latency_p99: summary.latency_p99,
            failed_requests: summary.failed_requests,
            error_rate: summary.error_rate,
            status_counts: summary.status_counts.clone(),
            batches: summary.batches.iter().map(BatchRecord::from).collect(),
        }
    }
}

impl From<&BatchResult> for BatchRecord {
    fn from(batch: &BatchResult) -> Self {
        Self {
            batch_number: batch.number(),
            batch_duration: batch.duration,
            request_count: batch.outcomes.len(),
            error: batch.failed,
        }
    }
}
