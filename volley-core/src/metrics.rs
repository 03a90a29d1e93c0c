//! Metric names recorded by the engine when the `metrics` feature is enabled.

/// Histogram of per-request latency in nanoseconds.
pub const REQUEST_LATENCY: &str = "volley_request_latency";

/// Counter of completed requests, labelled by `status`.
pub const REQUEST_STATUS: &str = "volley_request_status";

/// Counter of failed requests, labelled by `kind`.
pub const REQUEST_FAILURE: &str = "volley_request_failure";

/// Histogram of batch wall-clock duration in nanoseconds.
pub const BATCH_DURATION: &str = "volley_batch_duration";

pub const BATCH_FAILED: &str = "volley_batch_failed";
