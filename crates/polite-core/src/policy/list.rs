//! A crawl policy over a fixed list of URLs.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::{CrawlPolicy, PageMarkers};
use crate::url_model;

/// Shared flag that makes a [`ListPolicy`] stop handing out URLs.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Outcome of a list crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs completed, with the path the page was saved to (if any).
    pub done: Vec<(String, Option<PathBuf>)>,
    /// URLs that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

/// Fetches a fixed, ordered list of URLs and judges pages with [`PageMarkers`].
///
/// Completed pages are written to `out_dir` when one is set.
#[derive(Debug)]
pub struct ListPolicy {
    queue: VecDeque<String>,
    markers: PageMarkers,
    out_dir: Option<PathBuf>,
    report: CrawlReport,
    stop: StopHandle,
}

impl ListPolicy {
    pub fn new<I, S>(urls: I, markers: PageMarkers) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: urls.into_iter().map(Into::into).collect(),
            markers,
            out_dir: None,
            report: CrawlReport::default(),
            stop: StopHandle::default(),
        }
    }

    /// Save each completed page under `dir` (created on first write).
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Read URLs from a text file: one per line, blank lines and `#` comments skipped.
    pub fn urls_from_file(path: &Path) -> Result<Vec<String>> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read URL list: {}", path.display()))?;
        Ok(data
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    pub fn into_report(self) -> CrawlReport {
        self.report
    }

    fn save_page(&self, url: &str, content: &str) -> Result<Option<PathBuf>> {
        let Some(dir) = &self.out_dir else {
            return Ok(None);
        };
        std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
        let path = dir.join(url_model::page_file_name(url));
        std::fs::write(&path, content)
            .with_context(|| format!("write page: {}", path.display()))?;
        Ok(Some(path))
    }
}

impl CrawlPolicy for ListPolicy {
    fn next_url(&mut self) -> Option<String> {
        if self.stop.is_stopped() {
            if !self.queue.is_empty() {
                tracing::info!("stop requested; {} URL(s) left unvisited", self.queue.len());
                self.queue.clear();
            }
            return None;
        }
        self.queue.pop_front()
    }

    fn is_loaded(&mut self, _url: &str, content: &str) -> bool {
        self.markers.is_ready(content)
    }

    fn should_backoff(&mut self, content: &str) -> bool {
        self.markers.is_blocked(content)
    }

    fn notify_done(&mut self, url: &str, content: &str) {
        match self.save_page(url, content) {
            Ok(saved) => {
                if let Some(path) = &saved {
                    tracing::debug!(url, path = %path.display(), "saved page");
                }
                self.report.done.push((url.to_string(), saved));
            }
            Err(e) => {
                tracing::warn!(url, "could not save page: {:#}", e);
                self.report.failed.push((url.to_string(), format!("{:#}", e)));
            }
        }
    }

    fn handle_error(&mut self, url: &str, message: &str) {
        tracing::warn!(url, "fetch failed: {}", message);
        self.report.failed.push((url.to_string(), message.to_string()));
    }
}
