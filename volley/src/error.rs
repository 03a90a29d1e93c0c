use thiserror::Error;
use volley_core::ConfigError;

/// Setup failures. Once a run has started nothing is surfaced as an error; failures land in the
/// [`RunSummary`](volley_core::RunSummary) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unable to open summary file: {0}")]
    Sink(#[from] std::io::Error),
}
