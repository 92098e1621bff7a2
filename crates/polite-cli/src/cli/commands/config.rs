//! `polite config` – show settings locations and effective values.

use anyhow::Result;
use polite_core::cache::JsonFileCache;
use polite_core::config::{self, PoliteConfig};
use polite_core::logging;
use std::path::Path;

pub fn run_config(cfg: &PoliteConfig, explicit_path: Option<&Path>) -> Result<()> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    let cache_path = match &cfg.cache.path {
        Some(p) => p.clone(),
        None => JsonFileCache::default_path()?,
    };
    println!("# config file: {}", path.display());
    println!("# log file:    {}", logging::log_file_path()?.display());
    println!("# page cache:  {}", cache_path.display());
    println!();
    print!("{}", cfg.to_toml_string()?);
    Ok(())
}
