use crate::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, DEFAULT_TOTAL_REQUESTS};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Immutable description of a single load run.
///
/// Construct with [`RunConfig::new`] and adjust with the builder methods. The config is only
/// checked when an orchestrator is built from it (see [`RunConfig::validate`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub target_url: Url,
    pub total_requests: usize,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl RunConfig {
    pub fn new(target_url: Url) -> Self {
        Self {
            target_url,
            total_requests: DEFAULT_TOTAL_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn total_requests(mut self, total_requests: usize) -> Self {
        self.total_requests = total_requests;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.target_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(ConfigError::UnsupportedScheme(scheme.to_string())),
        }

        if self.total_requests == 0 {
            return Err(ConfigError::ZeroRequests);
        }

        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        if self.concurrency > self.total_requests {
            return Err(ConfigError::ConcurrencyExceedsTotal {
                concurrency: self.concurrency,
                total_requests: self.total_requests,
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Number of batches needed to cover `total_requests`, i.e. `ceil(total / concurrency)`.
    pub fn batch_count(&self) -> usize {
        if self.concurrency == 0 {
            return 0;
        }
        self.total_requests.div_ceil(self.concurrency)
    }

    /// Sizes of each batch in dispatch order. Every batch is `concurrency` wide except the last,
    /// which carries the remainder.
    pub fn batch_sizes(&self) -> BatchSizes {
        BatchSizes {
            remaining: self.total_requests,
            concurrency: self.concurrency,
        }
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "url={}, requests={}, concurrency={}, timeout={}",
            self.target_url,
            self.total_requests,
            self.concurrency,
            humantime::format_duration(self.timeout),
        )
    }
}

#[derive(Debug, Clone)]
pub struct BatchSizes {
    remaining: usize,
    concurrency: usize,
}

impl Iterator for BatchSizes {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.concurrency == 0 {
            return None;
        }

        let size = self.remaining.min(self.concurrency);
        self.remaining -= size;
        Some(size)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Total request count must be at least 1")]
    ZeroRequests,

    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Concurrency ({concurrency}) exceeds the total request count ({total_requests})")]
    ConcurrencyExceedsTotal {
        concurrency: usize,
        total_requests: usize,
    },

    #[error("Per-request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Unsupported URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),
}
