use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::{self, EngineConfig};
use crate::error::ConfigError;
use crate::policy::PageMarkers;
use crate::renderer::CurlOptions;

/// Pacing, load and backoff timing (`[engine]` in config.toml). Durations in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    pub min_wait_between_secs: f64,
    pub std_dev_wait_between_secs: f64,
    pub initial_backoff_secs: f64,
    pub max_backoff_secs: f64,
    pub wait_load_secs: f64,
    pub max_wait_load_secs: f64,
    /// Fixed jitter seed for reproducible runs; random when missing.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Give up on a URL after this many backoff retries; unbounded when missing.
    #[serde(default)]
    pub max_backoff_retries: Option<u32>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            min_wait_between_secs: engine::DEFAULT_MIN_WAIT_BETWEEN.as_secs_f64(),
            std_dev_wait_between_secs: engine::DEFAULT_STD_DEV_WAIT_BETWEEN.as_secs_f64(),
            initial_backoff_secs: engine::DEFAULT_INITIAL_BACKOFF.as_secs_f64(),
            max_backoff_secs: engine::DEFAULT_MAX_BACKOFF.as_secs_f64(),
            wait_load_secs: engine::DEFAULT_WAIT_LOAD.as_secs_f64(),
            max_wait_load_secs: engine::DEFAULT_MAX_WAIT_LOAD.as_secs_f64(),
            seed: None,
            max_backoff_retries: None,
        }
    }
}

/// HTTP renderer settings (`[http]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// Extra request headers sent with every load (`[http.headers]`).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for HttpSection {
    fn default() -> Self {
        let curl = CurlOptions::default();
        Self {
            user_agent: curl.user_agent,
            connect_timeout_secs: curl.connect_timeout.as_secs(),
            timeout_secs: curl.timeout.as_secs(),
            headers: BTreeMap::new(),
        }
    }
}

/// Result cache settings (`[cache]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSection {
    pub enabled: bool,
    /// Cache file; defaults to `~/.local/state/polite/page_cache.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Global configuration loaded from `~/.config/polite/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoliteConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub markers: PageMarkers,
    #[serde(default)]
    pub cache: CacheSection,
}

fn secs(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidSeconds { field, value })
}

impl PoliteConfig {
    /// Engine timing from `[engine]`, validated.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let e = &self.engine;
        let cfg = EngineConfig {
            min_wait_between: secs("min_wait_between_secs", e.min_wait_between_secs)?,
            std_dev_wait_between: secs("std_dev_wait_between_secs", e.std_dev_wait_between_secs)?,
            initial_backoff: secs("initial_backoff_secs", e.initial_backoff_secs)?,
            max_backoff: secs("max_backoff_secs", e.max_backoff_secs)?,
            wait_load: secs("wait_load_secs", e.wait_load_secs)?,
            max_wait_load: secs("max_wait_load_secs", e.max_wait_load_secs)?,
            max_backoff_retries: e.max_backoff_retries,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            user_agent: self.http.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            timeout: Duration::from_secs(self.http.timeout_secs),
            headers: self
                .http
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("polite")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PoliteConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PoliteConfig::default();
        let toml = default_cfg.to_toml_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<PoliteConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PoliteConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
