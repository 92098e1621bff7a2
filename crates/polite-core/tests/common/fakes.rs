//! Deterministic collaborators for engine tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use polite_core::cache::ResultCache;
use polite_core::clock::{Clock, Interrupted};
use polite_core::policy::CrawlPolicy;
use polite_core::random::GaussianSource;
use polite_core::renderer::PageRenderer;

#[derive(Debug, Default)]
struct ClockState {
    now_ms: u64,
    sleeps: Vec<Duration>,
    /// Zero-based sleep call indices that fail with `Interrupted`.
    interrupt_at: Vec<usize>,
    calls: usize,
}

/// Clock whose time only moves when something sleeps on it.
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    state: Arc<Mutex<ClockState>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th sleep call (zero-based) fail.
    pub fn interrupt_sleep(&self, n: usize) {
        self.state.lock().unwrap().interrupt_at.push(n);
    }

    /// Completed sleeps, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().unwrap().sleeps.clone()
    }

    pub fn sleep_calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }
}

impl Clock for FakeClock {
    fn now_millis(&self) -> u64 {
        self.state.lock().unwrap().now_ms
    }

    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut s = self.state.lock().unwrap();
        let call = s.calls;
        s.calls += 1;
        if s.interrupt_at.contains(&call) {
            return Err(Interrupted);
        }
        s.now_ms += duration.as_millis() as u64;
        s.sleeps.push(duration);
        Ok(())
    }
}

/// Returns the same sample forever.
pub struct FixedGaussian(pub f64);

impl GaussianSource for FixedGaussian {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

/// Renderer that serves a canned page per URL and timestamps each load.
#[derive(Debug)]
pub struct FakeRenderer {
    pages: HashMap<String, String>,
    default_page: String,
    clock: FakeClock,
    fail_on: Vec<String>,
    pub loads: Vec<(String, u64)>,
    current: Option<String>,
}

impl FakeRenderer {
    pub fn new(clock: &FakeClock) -> Self {
        Self {
            pages: HashMap::new(),
            default_page: "<html>page</html>".to_string(),
            clock: clock.clone(),
            fail_on: Vec::new(),
            loads: Vec::new(),
            current: None,
        }
    }

    pub fn page(mut self, url: &str, content: &str) -> Self {
        self.pages.insert(url.to_string(), content.to_string());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.fail_on.push(url.to_string());
        self
    }

    pub fn load_times(&self) -> Vec<u64> {
        self.loads.iter().map(|(_, t)| *t).collect()
    }
}

impl PageRenderer for FakeRenderer {
    fn load(&mut self, url: &str) -> anyhow::Result<()> {
        self.loads.push((url.to_string(), self.clock.now_millis()));
        if self.fail_on.iter().any(|u| u == url) {
            anyhow::bail!("connection refused");
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn current_content(&self) -> String {
        self.current
            .as_ref()
            .and_then(|u| self.pages.get(u))
            .cloned()
            .unwrap_or_else(|| self.default_page.clone())
    }

    fn current_url(&self) -> String {
        self.current.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Done(String, String),
    Error(String, String),
}

/// Policy driven by scripted answers. When a script runs out, pages are
/// loaded and not rejected.
#[derive(Debug, Default)]
pub struct ScriptedPolicy {
    urls: VecDeque<String>,
    loaded: VecDeque<bool>,
    backoff: VecDeque<bool>,
    pub next_url_calls: usize,
    pub is_loaded_calls: usize,
    pub events: Vec<Event>,
}

impl ScriptedPolicy {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn loaded(mut self, answers: &[bool]) -> Self {
        self.loaded = answers.iter().copied().collect();
        self
    }

    pub fn backoff(mut self, answers: &[bool]) -> Self {
        self.backoff = answers.iter().copied().collect();
        self
    }

    pub fn done(&self) -> Vec<(String, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Done(u, c) => Some((u.clone(), c.clone())),
                Event::Error(..) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Error(u, m) => Some((u.clone(), m.clone())),
                Event::Done(..) => None,
            })
            .collect()
    }
}

impl CrawlPolicy for ScriptedPolicy {
    fn next_url(&mut self) -> Option<String> {
        self.next_url_calls += 1;
        self.urls.pop_front()
    }

    fn is_loaded(&mut self, _url: &str, _content: &str) -> bool {
        self.is_loaded_calls += 1;
        self.loaded.pop_front().unwrap_or(true)
    }

    fn should_backoff(&mut self, _content: &str) -> bool {
        self.backoff.pop_front().unwrap_or(false)
    }

    fn notify_done(&mut self, url: &str, content: &str) {
        self.events.push(Event::Done(url.to_string(), content.to_string()));
    }

    fn handle_error(&mut self, url: &str, message: &str) {
        self.events.push(Event::Error(url.to_string(), message.to_string()));
    }
}

/// In-memory cache that logs every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingCache {
    pages: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingCache {
    pub fn with_page(self, url: &str, content: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page(&self, url: &str) -> Option<String> {
        self.pages.lock().unwrap().get(url).cloned()
    }
}

impl ResultCache for RecordingCache {
    fn contains(&self, url: &str) -> bool {
        self.calls.lock().unwrap().push(format!("contains {url}"));
        self.pages.lock().unwrap().contains_key(url)
    }

    fn get(&self, url: &str) -> Option<String> {
        self.calls.lock().unwrap().push(format!("get {url}"));
        self.pages.lock().unwrap().get(url).cloned()
    }

    fn put(&mut self, url: &str, content: &str) {
        self.calls.lock().unwrap().push(format!("put {url}"));
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), content.to_string());
    }
}
