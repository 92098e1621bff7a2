//! Result cache persisted as JSON under the XDG state dir, so pages
//! survive across runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ResultCache;

/// Suffix of the snapshot being written, renamed over the cache when complete.
const TEMP_SUFFIX: &str = ".part";

/// On-disk snapshot of the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedCache {
    #[serde(default = "default_version")]
    version: u8,
    pages: HashMap<String, String>,
}

fn default_version() -> u8 {
    1
}

/// [`ResultCache`] that rewrites its JSON file on every `put`.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    pages: HashMap<String, String>,
}

impl JsonFileCache {
    /// Default path: `~/.local/state/polite/page_cache.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("polite")?;
        Ok(xdg_dirs.get_state_home().join("page_cache.json"))
    }

    /// Open the cache at `path`. A missing file is an empty cache.
    pub fn open(path: &Path) -> Result<Self> {
        let pages = match std::fs::read(path) {
            Ok(bytes) => {
                let snapshot: PersistedCache = serde_json::from_slice(&bytes)
                    .with_context(|| format!("parse page cache: {}", path.display()))?;
                snapshot.pages
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("read page cache: {}", path.display()))
            }
        };
        tracing::debug!(path = %path.display(), pages = pages.len(), "opened page cache");
        Ok(Self {
            path: path.to_path_buf(),
            pages,
        })
    }

    /// Like [`open`](Self::open), but an unreadable snapshot (e.g. truncated
    /// by a crash) is logged and replaced by an empty cache on the next `put`.
    pub fn open_or_empty(path: &Path) -> Result<Self> {
        match Self::open(path) {
            Ok(cache) => Ok(cache),
            Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
                tracing::warn!("discarding page cache: {:#}", e);
                Ok(Self {
                    path: path.to_path_buf(),
                    pages: HashMap::new(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the cache file at `path`. Returns false if there was none.
    pub fn clear(path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove page cache: {}", path.display())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Write the current pages to disk (creates parent dir if needed).
    /// The snapshot goes to `<path>.part` first and is renamed over the
    /// cache, so an interrupted write leaves the previous snapshot intact.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let snapshot = PersistedCache {
            version: 1,
            pages: self.pages.clone(),
        };
        let json = serde_json::to_string(&snapshot).context("serialize page cache")?;
        let temp_path = temp_path(&self.path);
        std::fs::write(&temp_path, json)
            .with_context(|| format!("write page cache: {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(TEMP_SUFFIX);
    PathBuf::from(s)
}

impl ResultCache for JsonFileCache {
    fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    fn get(&self, url: &str) -> Option<String> {
        self.pages.get(url).cloned()
    }

    fn put(&mut self, url: &str, content: &str) {
        self.pages.insert(url.to_string(), content.to_string());
        if let Err(e) = self.save() {
            tracing::warn!("could not persist page cache: {:#}", e);
        }
    }
}
