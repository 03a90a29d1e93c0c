use pdatastructs::tdigest::{TDigest, K1};
use std::collections::BTreeMap;
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use volley_core::{BatchResult, RunSummary};

const TDIGEST_BACKLOG_SIZE: usize = 100;

/// Run-level accumulator, folded one batch at a time by the orchestrator.
pub(crate) struct RunStats {
    batches: Vec<BatchResult>,
    latency: TDigest<K1>,
    latency_sum: Duration,
    recorded: usize,
    failed_requests: usize,
    status_counts: BTreeMap<u16, usize>,
    batch_duration_sum: Duration,
}

impl RunStats {
    pub fn new(batch_count: usize) -> Self {
        Self {
            batches: Vec::with_capacity(batch_count),
            latency: default_tdigest(),
            latency_sum: Duration::ZERO,
            recorded: 0,
            failed_requests: 0,
            status_counts: BTreeMap::new(),
            batch_duration_sum: Duration::ZERO,
        }
    }

    pub fn push(&mut self, batch: BatchResult) {
        #[cfg(feature = "metrics")]
        record_metrics(&batch);

        self.batch_duration_sum += batch.duration;

        for outcome in &batch.outcomes {
            self.recorded += 1;
            self.latency_sum += outcome.elapsed;
            self.latency.insert(outcome.elapsed.as_secs_f64());

            if outcome.is_failure() {
                self.failed_requests += 1;
            } else {
                *self.status_counts.entry(outcome.status).or_default() += 1;
            }
        }

        self.batches.push(batch);
    }

    pub fn finish(self, total_duration: Duration) -> RunSummary {
        let error_rate = if self.recorded == 0 {
            0.
        } else {
            self.failed_requests as f64 / self.recorded as f64
        };

        RunSummary {
            total_duration,
            average_request_latency: mean(self.latency_sum, self.recorded),
            average_batch_duration: mean(self.batch_duration_sum, self.batches.len()),
            latency_p50: self.quantile(0.5),
            latency_p90: self.quantile(0.9),
            latency_p99: self.quantile(0.99),
            failed_requests: self.failed_requests,
            status_counts: self.status_counts,
            error_rate,
            batches: self.batches,
        }
    }

    fn quantile(&self, quantile: f64) -> Duration {
        if self.recorded == 0 {
            return Duration::ZERO;
        }

        let secs = self.latency.quantile(quantile);
        let secs = if secs.is_finite() && secs >= 0. {
            secs
        } else {
            warn!("Invalid latency quantile {secs} for q={quantile}, reporting zero.");
            0.
        };

        Duration::from_secs_f64(secs)
    }
}

fn mean(sum: Duration, count: usize) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((sum.as_nanos() / count as u128) as u64)
}

fn default_tdigest() -> TDigest<K1> {
    TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE)
}

#[cfg(feature = "metrics")]
fn record_metrics(batch: &BatchResult) {
    use volley_core::{
        BATCH_DURATION, BATCH_FAILED, REQUEST_FAILURE, REQUEST_LATENCY, REQUEST_STATUS,
    };

    metrics::histogram!(BATCH_DURATION).record(batch.duration.as_nanos() as f64);
    if batch.failed {
        metrics::counter!(BATCH_FAILED).increment(1);
    }

    for outcome in &batch.outcomes {
        metrics::histogram!(REQUEST_LATENCY).record(outcome.elapsed.as_nanos() as f64);
        match outcome.failure {
            Some(failure) => {
                metrics::counter!(REQUEST_FAILURE, "kind" => failure.as_str()).increment(1)
            }
            None => metrics::counter!(REQUEST_STATUS, "status" => outcome.status.to_string())
                .increment(1),
        }
    }
}
