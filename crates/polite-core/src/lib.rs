//! polite: paced, backoff-aware page fetching.
//!
//! The [`engine::PoliteEngine`] sits between a [`policy::CrawlPolicy`] that
//! supplies URLs and judges pages, and a [`renderer::PageRenderer`] that
//! loads them. It spaces requests with randomized delays, polls until pages
//! finish loading, and backs off exponentially while the target rejects us.

pub mod config;
pub mod logging;

pub mod cache;
pub mod clock;
pub mod engine;
pub mod error;
pub mod policy;
pub mod random;
pub mod renderer;
pub mod url_model;

pub use engine::{EngineConfig, PoliteEngine, RunSummary};
pub use error::{ConfigError, ScrapeError};
