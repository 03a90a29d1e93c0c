use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Why a request was scored with status `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    /// No complete response before the per-request deadline.
    Timeout,
    /// Connection refused, DNS failure, reset and the like.
    Transport,
    /// A response arrived but its body could not be read or decoded as JSON.
    Decode,
}

impl Failure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Failure::Timeout => "timeout",
            Failure::Transport => "transport",
            Failure::Decode => "decode",
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified result of a single request attempt.
///
/// Any HTTP status, 4xx and 5xx included, is a completed outcome. Only transport, timeout and
/// decode failures map to status `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub status: u16,
    pub elapsed: Duration,
    pub failure: Option<Failure>,
    /// Underlying error message for transport and decode failures.
    pub detail: Option<String>,
}

impl RequestOutcome {
    pub fn completed(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            elapsed,
            failure: None,
            detail: None,
        }
    }

    pub fn failed(failure: Failure, elapsed: Duration) -> Self {
        Self {
            status: 0,
            elapsed,
            failure: Some(failure),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn timed_out() -> Self {
        Self::failed(Failure::Timeout, Duration::ZERO)
    }

    pub fn is_failure(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// 0-based position of the batch within the run.
    pub index: usize,
    /// Number of requests the batch was planned with.
    pub size: usize,
    /// Positional outcomes; empty when the batch itself failed.
    pub outcomes: Vec<RequestOutcome>,
    pub duration: Duration,
    pub failed: bool,
}

impl BatchResult {
    pub fn completed(index: usize, outcomes: Vec<RequestOutcome>, duration: Duration) -> Self {
        Self {
            index,
            size: outcomes.len(),
            outcomes,
            duration,
            failed: false,
        }
    }

    pub fn failed(index: usize, size: usize, duration: Duration) -> Self {
        Self {
            index,
            size,
            outcomes: vec![],
            duration,
            failed: true,
        }
    }

    /// 1-based batch number, as shown to operators.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Aggregate statistics of a full run.
///
/// Latency figures cover every recorded outcome, failed requests included at their recorded
/// elapsed time. Batches that failed as a whole have no outcomes and do not contribute.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_duration: Duration,
    pub average_request_latency: Duration,
    pub average_batch_duration: Duration,
    pub latency_p50: Duration,
    pub latency_p90: Duration,
    pub latency_p99: Duration,
    pub failed_requests: usize,
    pub status_counts: BTreeMap<u16, usize>,
    pub error_rate: f64,
    pub batches: Vec<BatchResult>,
}

impl RunSummary {
    pub fn recorded_requests(&self) -> usize {
        self.batches.iter().map(|b| b.outcomes.len()).sum()
    }

    pub fn failed_batches(&self) -> usize {
        self.batches.iter().filter(|b| b.failed).count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Requests={}, Batches={} (failed={}), ErrorRate={:.2}, Total={:?}, AvgLatency={:?}, AvgBatch={:?}, p50={:?}, p90={:?}, p99={:?}",
            self.recorded_requests(),
            self.batches.len(),
            self.failed_batches(),
            self.error_rate,
            self.total_duration,
            self.average_request_latency,
            self.average_batch_duration,
            self.latency_p50,
            self.latency_p90,
            self.latency_p99,
        )
    }
}
