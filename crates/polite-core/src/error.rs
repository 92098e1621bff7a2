//! Error types for a single page fetch and for engine configuration.

use std::time::Duration;

use thiserror::Error;

use crate::clock::Interrupted;

/// Why fetching one URL failed. Every variant is handled at the per-URL
/// boundary of the run loop and never stops the run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The crawl policy never reported the page as loaded within `limit`.
    #[error("URL '{url}' timed out after {} ms", limit.as_millis())]
    Timeout { url: String, limit: Duration },

    /// A sleep was interrupted by the host.
    #[error("Unexpectedly interrupted from sleep")]
    Interrupted,

    /// The renderer could not load the page at all (DNS, connection, ...).
    #[error("failed to render '{url}': {message}")]
    Render { url: String, message: String },

    /// The configured retry ceiling was reached while the target kept rejecting us.
    #[error("URL '{url}' still rejected after {attempts} backoff retries")]
    BackoffExhausted { url: String, attempts: u32 },
}

impl From<Interrupted> for ScrapeError {
    fn from(_: Interrupted) -> Self {
        ScrapeError::Interrupted
    }
}

/// Invalid engine configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max backoff ({max:?}) must be at least the initial backoff ({initial:?})")]
    BackoffBounds { initial: Duration, max: Duration },

    #[error("max wait-load ({max:?}) must be at least wait-load ({wait:?})")]
    WaitLoadBounds { wait: Duration, max: Duration },

    #[error("invalid duration for {field}: {value} seconds")]
    InvalidSeconds { field: &'static str, value: f64 },
}
