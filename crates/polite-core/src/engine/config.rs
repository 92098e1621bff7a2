//! Engine timing parameters.

use std::time::Duration;

use crate::error::ConfigError;

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(2 * MS_PER_MINUTE);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(20 * MS_PER_MINUTE);
pub const DEFAULT_WAIT_LOAD: Duration = Duration::from_millis(5 * MS_PER_SECOND);
pub const DEFAULT_MAX_WAIT_LOAD: Duration = Duration::from_millis(10 * 5 * MS_PER_SECOND);
pub const DEFAULT_MIN_WAIT_BETWEEN: Duration = Duration::from_millis(10 * MS_PER_SECOND);
pub const DEFAULT_STD_DEV_WAIT_BETWEEN: Duration = Duration::from_millis(2 * 5 * MS_PER_SECOND);

/// Immutable timing configuration of a [`PoliteEngine`](super::PoliteEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Floor on the spacing between two render triggers.
    pub min_wait_between: Duration,
    /// Scale of the random extra spacing added above the floor.
    pub std_dev_wait_between: Duration,
    /// Backoff applied (before growth) at the start of a backoff episode.
    pub initial_backoff: Duration,
    /// Upper bound on any backoff sleep.
    pub max_backoff: Duration,
    /// Pause before each load-completion check.
    pub wait_load: Duration,
    /// Budget from render trigger until a still-unloaded page times out.
    pub max_wait_load: Duration,
    /// Backoff retries allowed per URL; `None` retries until the target
    /// stops rejecting.
    pub max_backoff_retries: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_wait_between: DEFAULT_MIN_WAIT_BETWEEN,
            std_dev_wait_between: DEFAULT_STD_DEV_WAIT_BETWEEN,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            wait_load: DEFAULT_WAIT_LOAD,
            max_wait_load: DEFAULT_MAX_WAIT_LOAD,
            max_backoff_retries: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_backoff < self.initial_backoff {
            return Err(ConfigError::BackoffBounds {
                initial: self.initial_backoff,
                max: self.max_backoff,
            });
        }
        if self.max_wait_load < self.wait_load {
            return Err(ConfigError::WaitLoadBounds {
                wait: self.wait_load,
                max: self.max_wait_load,
            });
        }
        Ok(())
    }
}
