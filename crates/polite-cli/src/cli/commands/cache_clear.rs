//! `polite cache-clear` – delete the page cache file.

use anyhow::Result;
use polite_core::cache::JsonFileCache;
use polite_core::config::PoliteConfig;

pub fn run_cache_clear(cfg: &PoliteConfig) -> Result<()> {
    let path = match &cfg.cache.path {
        Some(p) => p.clone(),
        None => JsonFileCache::default_path()?,
    };
    if JsonFileCache::clear(&path)? {
        println!("Removed page cache {}", path.display());
    } else {
        println!("No page cache at {}", path.display());
    }
    Ok(())
}
