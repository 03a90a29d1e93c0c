mod config;
mod constants;
mod data;
mod metrics;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use metrics::*;
