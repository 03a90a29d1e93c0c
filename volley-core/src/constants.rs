use std::time::Duration;

/// The per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_CONCURRENCY: usize = 100;

pub const DEFAULT_TOTAL_REQUESTS: usize = 10_000;
