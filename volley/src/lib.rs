//! Volley fires a fixed number of GET requests at a single URL, in consecutive batches of at most
//! `concurrency` in-flight requests, and reports how they went.
//!
//! Every request is bounded by a deadline, every outcome (including timeouts and transport
//! errors) is recorded, and a failed batch never ends the run early.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use volley::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), volley::Error> {
//!     let config = RunConfig::new("http://127.0.0.1:3002/status/200/delay/ms/10".parse().unwrap())
//!         .total_requests(1_000)
//!         .concurrency(50)
//!         .timeout(Duration::from_secs(2));
//!
//!     let summary = volley::run(config, LogSink::new().quiet()).await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
pub mod deadline;
pub mod dispatcher;
pub mod executor;
pub mod limiter;
pub mod orchestrator;
pub mod sink;

mod error;
pub(crate) mod stats;

pub use error::Error;
pub use executor::HttpExecutor;
pub use orchestrator::Orchestrator;
pub use sink::{CompositeSink, JsonFileSink, LogSink, NullSink, Sink};
pub use volley_core::{
    BatchResult, ConfigError, Failure, RequestOutcome, RunConfig, RunSummary, DEFAULT_CONCURRENCY,
    DEFAULT_TIMEOUT, DEFAULT_TOTAL_REQUESTS,
};

pub mod prelude {
    pub use crate::orchestrator::Orchestrator;
    pub use crate::sink::{CompositeSink, JsonFileSink, LogSink, NullSink, Sink};
    pub use volley_core::{
        BatchResult, ConfigError, Failure, RequestOutcome, RunConfig, RunSummary,
    };
}

/// Run `config` against its target over HTTP, reporting to `sink`.
///
/// Only setup can fail: an invalid config or an HTTP client that cannot be built. The run itself
/// always produces a summary.
pub async fn run<S: Sink>(config: RunConfig, sink: S) -> Result<RunSummary, Error> {
    config.validate()?;

    let executor = HttpExecutor::from_config(&config)?;
    let orchestrator = Orchestrator::new(config, move || {
        let executor = executor.clone();
        async move { executor.execute().await }
    })?;

    Ok(orchestrator.run(sink).await)
}
