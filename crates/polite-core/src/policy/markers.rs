//! Substring markers for judging rendered pages.

use serde::{Deserialize, Serialize};

/// Case-insensitive substrings that decide whether a page is complete or a
/// rejection page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMarkers {
    /// A page is loaded when it contains every one of these.
    #[serde(default)]
    pub ready: Vec<String>,
    /// A page is a rejection when it contains any of these.
    #[serde(default)]
    pub block: Vec<String>,
}

impl Default for PageMarkers {
    fn default() -> Self {
        Self {
            ready: vec!["</html>".to_string()],
            block: vec![
                "too many requests".to_string(),
                "request rejected".to_string(),
                "rate limit exceeded".to_string(),
            ],
        }
    }
}

impl PageMarkers {
    pub fn is_ready(&self, content: &str) -> bool {
        let haystack = content.to_lowercase();
        self.ready
            .iter()
            .all(|m| haystack.contains(&m.to_lowercase()))
    }

    pub fn is_blocked(&self, content: &str) -> bool {
        let haystack = content.to_lowercase();
        self.block
            .iter()
            .any(|m| haystack.contains(&m.to_lowercase()))
    }
}
