//! Load-completion poll.

use super::PoliteEngine;
use crate::error::ScrapeError;
use crate::policy::CrawlPolicy;
use crate::renderer::PageRenderer;

impl<R: PageRenderer, P: CrawlPolicy> PoliteEngine<R, P> {
    /// Poll at a fixed `wait_load` cadence until the policy reports the page
    /// loaded. Times out once more than `max_wait_load` has passed since the
    /// render was triggered and the page is still not loaded.
    pub(super) fn wait_for_load(&mut self) -> Result<String, ScrapeError> {
        let deadline_ms = self
            .last_request_ms
            .saturating_add(self.config.max_wait_load.as_millis() as u64);
        loop {
            self.clock.sleep(self.config.wait_load)?;

            let content = self.renderer.current_content();
            let url = self.renderer.current_url();
            if self.policy.is_loaded(&url, &content) {
                return Ok(content);
            }
            if self.clock.now_millis() > deadline_ms {
                return Err(ScrapeError::Timeout {
                    url,
                    limit: self.config.max_wait_load,
                });
            }
            tracing::warn!(url = %url, "page not fully loaded yet");
        }
    }
}
