//! Builder for [`PoliteEngine`].

use std::time::Duration;

use super::backoff::Backoff;
use super::{EngineConfig, PoliteEngine, RunSummary};
use crate::cache::ResultCache;
use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::policy::CrawlPolicy;
use crate::random::{GaussianSource, SeededGaussian};
use crate::renderer::PageRenderer;

/// Collects collaborators and timing before constructing an engine.
///
/// Only the renderer and the crawl policy are required. Without an explicit
/// clock the engine uses a [`SystemClock`]; without a Gaussian source or a
/// seed it seeds a [`SeededGaussian`] from the current time.
pub struct EngineBuilder<R, P> {
    renderer: R,
    policy: P,
    cache: Option<Box<dyn ResultCache>>,
    clock: Option<Box<dyn Clock>>,
    gaussian: Option<Box<dyn GaussianSource>>,
    seed: Option<u64>,
    config: EngineConfig,
}

impl<R: PageRenderer, P: CrawlPolicy> EngineBuilder<R, P> {
    pub(super) fn new(renderer: R, policy: P) -> Self {
        Self {
            renderer,
            policy,
            cache: None,
            clock: None,
            gaussian: None,
            seed: None,
            config: EngineConfig::default(),
        }
    }

    pub fn cache(mut self, cache: impl ResultCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Use this jitter source; takes precedence over [`seed`](Self::seed).
    pub fn gaussian(mut self, gaussian: impl GaussianSource + 'static) -> Self {
        self.gaussian = Some(Box::new(gaussian));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace all timing parameters at once.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn min_wait_between(mut self, d: Duration) -> Self {
        self.config.min_wait_between = d;
        self
    }

    pub fn std_dev_wait_between(mut self, d: Duration) -> Self {
        self.config.std_dev_wait_between = d;
        self
    }

    pub fn initial_backoff(mut self, d: Duration) -> Self {
        self.config.initial_backoff = d;
        self
    }

    pub fn max_backoff(mut self, d: Duration) -> Self {
        self.config.max_backoff = d;
        self
    }

    pub fn wait_load(mut self, d: Duration) -> Self {
        self.config.wait_load = d;
        self
    }

    pub fn max_wait_load(mut self, d: Duration) -> Self {
        self.config.max_wait_load = d;
        self
    }

    pub fn max_backoff_retries(mut self, retries: Option<u32>) -> Self {
        self.config.max_backoff_retries = retries;
        self
    }

    pub fn build(self) -> Result<PoliteEngine<R, P>, ConfigError> {
        self.config.validate()?;

        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()));
        let gaussian = match (self.gaussian, self.seed) {
            (Some(g), _) => g,
            (None, Some(seed)) => Box::new(SeededGaussian::new(seed)),
            (None, None) => Box::new(SeededGaussian::from_time()),
        };
        let last_request_ms = clock.now_millis();
        let backoff = Backoff::new(self.config.initial_backoff, self.config.max_backoff);

        Ok(PoliteEngine {
            renderer: self.renderer,
            policy: self.policy,
            cache: self.cache,
            clock,
            gaussian,
            config: self.config,
            last_request_ms,
            backoff,
            summary: RunSummary::default(),
        })
    }
}
