//! CLI command handlers, one per file.

mod cache_clear;
mod config;
mod run;

pub use cache_clear::run_cache_clear;
pub use config::run_config;
pub use run::{run_fetch, FetchArgs};
