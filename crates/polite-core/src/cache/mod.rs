//! Result cache that can short-circuit a fetch.
//!
//! The engine consults the cache before pacing a request: a URL already
//! retrieved is reported to the crawl policy straight from the cache and
//! never rendered again.

mod file;

pub use file::JsonFileCache;

use std::collections::HashMap;

/// Pages already retrieved, keyed by requested URL.
pub trait ResultCache: Send {
    fn contains(&self, url: &str) -> bool;

    fn get(&self, url: &str) -> Option<String>;

    fn put(&mut self, url: &str, content: &str);
}

/// Process-local cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    pages: HashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl ResultCache for MemoryCache {
    fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    fn get(&self, url: &str) -> Option<String> {
        self.pages.get(url).cloned()
    }

    fn put(&mut self, url: &str, content: &str) {
        self.pages.insert(url.to_string(), content.to_string());
    }
}
