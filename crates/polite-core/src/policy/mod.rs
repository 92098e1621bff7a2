//! Crawl policy: the site-specific side of a crawl.
//!
//! The engine knows nothing about the site being fetched. A [`CrawlPolicy`]
//! supplies URLs, decides when a rendered page is complete, recognises
//! rejection pages that call for a backoff, and receives the results.

mod list;
mod markers;

pub use list::{CrawlReport, ListPolicy, StopHandle};
pub use markers::PageMarkers;

/// Site-specific decisions the engine delegates.
pub trait CrawlPolicy: Send {
    /// Next URL to fetch; `None` ends the run.
    fn next_url(&mut self) -> Option<String>;

    /// Whether `content`, rendered from the resolved `url`, is fully loaded.
    fn is_loaded(&mut self, url: &str, content: &str) -> bool;

    /// Whether `content` is a rejection (rate limit, block page) that
    /// requires backing off and retrying the same URL.
    fn should_backoff(&mut self, content: &str) -> bool;

    /// Called once per URL with the final page content.
    fn notify_done(&mut self, url: &str, content: &str);

    /// Called once per URL that could not be fetched.
    fn handle_error(&mut self, url: &str, message: &str);
}
