//! A single timed GET against the target.
use crate::deadline::with_deadline;
use reqwest::{Client, Url};
use serde::de::IgnoredAny;
use std::time::Duration;
use tokio::time::Instant;
use volley_core::{Failure, RequestOutcome, RunConfig};

/// Issues one GET per [`execute`](HttpExecutor::execute) call and classifies the result.
///
/// Cheap to clone; the underlying [`Client`] shares its connection pool between clones.
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpExecutor {
    pub fn new(client: Client, url: Url, timeout: Duration) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }

    pub fn from_config(config: &RunConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::new(client, config.target_url.clone(), config.timeout))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform the request. Never takes meaningfully longer than the configured timeout.
    ///
    /// - no complete response in time: `{0, 0, Timeout}`
    /// - connection could not be made or no headers arrived: `{0, 0, Transport}`
    /// - body could not be read or is not JSON: `{0, time-to-headers, Decode}`
    /// - anything else: `{status, time-to-decoded-body}`
    ///
    /// Transport and decode failures carry the error message, including its causes, as `detail`.
    pub async fn execute(&self) -> RequestOutcome {
        let start = Instant::now();
        match with_deadline(self.fetch(start), self.timeout).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => RequestOutcome::timed_out(),
        }
    }

    async fn fetch(&self, start: Instant) -> RequestOutcome {
        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                return RequestOutcome::failed(Failure::Transport, Duration::ZERO)
                    .with_detail(describe(&err))
            }
        };
        let headers_elapsed = start.elapsed();
        let status = response.status().as_u16();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                return RequestOutcome::failed(Failure::Decode, headers_elapsed)
                    .with_detail(describe(&err))
            }
        };

        match serde_json::from_slice::<IgnoredAny>(&body) {
            Ok(_) => RequestOutcome::completed(status, start.elapsed()),
            Err(err) => {
                RequestOutcome::failed(Failure::Decode, headers_elapsed).with_detail(describe(&err))
            }
        }
    }
}

/// `err` followed by each of its sources, so a refused connection reads differently from a DNS or
/// TLS failure.
fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
