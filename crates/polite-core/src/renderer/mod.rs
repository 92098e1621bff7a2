//! Page renderer: loads a URL and exposes what it rendered.

mod http;

pub use http::{CurlOptions, CurlRenderer};

/// Something that navigates to a URL and exposes the result.
///
/// `current_content` and `current_url` may be read repeatedly after a
/// `load`; a renderer that executes scripts may return more complete
/// markup on later reads.
pub trait PageRenderer: Send {
    /// Navigate to `url`. Errors mean the page could not be loaded at all.
    fn load(&mut self, url: &str) -> anyhow::Result<()>;

    /// Markup of the current page.
    fn current_content(&self) -> String;

    /// Resolved URL of the current page (after redirects).
    fn current_url(&self) -> String;
}
