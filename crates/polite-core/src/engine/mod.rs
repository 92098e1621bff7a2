//! Politeness engine: paces requests, waits for pages to finish loading,
//! and backs off while the target rejects us.
//!
//! One fetch at a time, fully blocking. Per URL the engine:
//! 1. serves it from the result cache if possible;
//! 2. sleeps until the jittered inter-request interval has passed;
//! 3. triggers the render and polls the crawl policy until the page is
//!    loaded or the load budget is spent;
//! 4. if the policy sees a rejection page, sleeps a growing backoff and
//!    starts over at step 2 for the same URL.
//!
//! Failures are reported to the policy per URL and never end the run.

mod backoff;
mod builder;
mod config;
mod load;
mod pacing;

pub use backoff::Backoff;
pub use builder::EngineBuilder;
pub use config::{
    EngineConfig, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_WAIT_LOAD,
    DEFAULT_MIN_WAIT_BETWEEN, DEFAULT_STD_DEV_WAIT_BETWEEN, DEFAULT_WAIT_LOAD,
};

use crate::cache::ResultCache;
use crate::clock::Clock;
use crate::error::ScrapeError;
use crate::policy::CrawlPolicy;
use crate::random::GaussianSource;
use crate::renderer::PageRenderer;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Counters for one [`PoliteEngine::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs handed out by the policy.
    pub urls: u32,
    /// URLs rendered and reported done.
    pub fetched: u32,
    /// URLs reported done straight from the cache.
    pub from_cache: u32,
    /// URLs reported to the policy as errors.
    pub failed: u32,
    /// Backoff sleeps taken.
    pub backoffs: u32,
}

/// The request-pacing state machine between a crawl policy and a renderer.
pub struct PoliteEngine<R, P> {
    renderer: R,
    policy: P,
    cache: Option<Box<dyn ResultCache>>,
    clock: Box<dyn Clock>,
    gaussian: Box<dyn GaussianSource>,
    config: EngineConfig,
    /// Clock reading at the last render trigger.
    last_request_ms: u64,
    backoff: Backoff,
    summary: RunSummary,
}

impl<R: PageRenderer, P: CrawlPolicy> PoliteEngine<R, P> {
    pub fn builder(renderer: R, policy: P) -> EngineBuilder<R, P> {
        EngineBuilder::new(renderer, policy)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Current backoff; equals the initial backoff outside a backoff episode.
    pub fn current_backoff(&self) -> std::time::Duration {
        self.backoff.current()
    }

    pub fn into_parts(self) -> (R, P) {
        (self.renderer, self.policy)
    }

    /// Fetch every URL the policy hands out, until it returns `None`.
    pub fn run(&mut self) -> RunSummary {
        self.summary = RunSummary::default();

        while let Some(url) = self.policy.next_url() {
            self.summary.urls += 1;

            if let Some(cached) = self.cached(&url) {
                tracing::debug!(url = %url, "serving from cache");
                self.summary.from_cache += 1;
                self.policy.notify_done(&url, &cached);
                continue;
            }

            match self.fetch(&url) {
                Ok(content) => {
                    if let Some(cache) = self.cache.as_mut() {
                        cache.put(&url, &content);
                    }
                    self.summary.fetched += 1;
                    self.policy.notify_done(&url, &content);
                }
                Err(e) => {
                    self.summary.failed += 1;
                    self.policy.handle_error(&url, &e.to_string());
                }
            }
        }

        let s = self.summary;
        tracing::info!(
            urls = s.urls,
            fetched = s.fetched,
            from_cache = s.from_cache,
            failed = s.failed,
            backoffs = s.backoffs,
            "run finished"
        );
        s
    }

    /// Paced fetch of one URL, retrying for as long as the policy reports a
    /// rejection (or until `max_backoff_retries`, if configured).
    pub fn fetch(&mut self, url: &str) -> Result<String, ScrapeError> {
        let mut retries = 0u32;
        loop {
            let content = self.paced_render(url)?;
            if !self.policy.should_backoff(&content) {
                self.backoff.reset();
                return Ok(content);
            }
            if let Some(limit) = self.config.max_backoff_retries {
                if retries >= limit {
                    return Err(ScrapeError::BackoffExhausted {
                        url: url.to_string(),
                        attempts: retries,
                    });
                }
            }
            self.back_off()?;
            retries += 1;
        }
    }

    fn cached(&self, url: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        if cache.contains(url) {
            cache.get(url)
        } else {
            None
        }
    }

    /// Wait out the inter-request interval, trigger the render, and wait
    /// for the page to finish loading.
    fn paced_render(&mut self, url: &str) -> Result<String, ScrapeError> {
        let delay = pacing::inter_request_delay(
            self.config.min_wait_between,
            self.config.std_dev_wait_between,
            self.last_request_ms,
            self.clock.now_millis(),
            self.gaussian.sample(),
        );
        if !delay.is_zero() {
            tracing::debug!("waiting {:?} before next request", delay);
            self.clock.sleep(delay)?;
        }

        tracing::info!("requesting URL: {}", url);
        self.last_request_ms = self.clock.now_millis();
        self.renderer
            .load(url)
            .map_err(|e| ScrapeError::Render {
                url: url.to_string(),
                message: format!("{:#}", e),
            })?;
        self.wait_for_load()
    }

    fn back_off(&mut self) -> Result<(), ScrapeError> {
        let delay = self.backoff.grow(self.gaussian.sample());
        self.summary.backoffs += 1;
        tracing::warn!(
            "backing off {:.1} minutes",
            delay.as_millis() as f64 / MS_PER_MINUTE
        );
        self.clock.sleep(delay)?;
        Ok(())
    }
}
