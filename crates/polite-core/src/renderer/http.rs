//! Blocking HTTP renderer using the curl crate (libcurl).
//!
//! Fetches the body with a GET, following redirects, and records the
//! effective URL. Non-2xx responses are not errors here: rate-limit and
//! block pages must reach the crawl policy so it can ask for a backoff.

use std::str;
use std::time::Duration;

use anyhow::{Context, Result};

use super::PageRenderer;

/// Connection settings for [`CurlRenderer`].
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Extra request headers as (name, value).
    pub headers: Vec<(String, String)>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!("polite/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            headers: Vec::new(),
        }
    }
}

/// [`PageRenderer`] backed by a fresh curl `Easy` handle per load.
#[derive(Debug, Default)]
pub struct CurlRenderer {
    options: CurlOptions,
    content: String,
    url: String,
    status: Option<u32>,
}

impl CurlRenderer {
    pub fn new(options: CurlOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// HTTP status of the last completed load.
    pub fn last_status(&self) -> Option<u32> {
        self.status
    }
}

impl PageRenderer for CurlRenderer {
    fn load(&mut self, url: &str) -> Result<()> {
        self.content.clear();
        self.url = url.to_string();
        self.status = None;

        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.useragent(&self.options.user_agent)?;
        easy.accept_encoding("")?; // any encoding curl can decode
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;

        if !self.options.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &self.options.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer
                .perform()
                .with_context(|| format!("GET {} failed", url))?;
        }

        let code = easy.response_code().context("no response code")?;
        if let Some(effective) = easy.effective_url()? {
            self.url = effective.to_string();
        }
        if !(200..300).contains(&code) {
            tracing::debug!(url, code, "non-success response; passing body to policy");
        }
        self.status = Some(code);
        self.content = String::from_utf8_lossy(&body).into_owned();
        Ok(())
    }

    fn current_content(&self) -> String {
        self.content.clone()
    }

    fn current_url(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_renderer_is_empty() {
        let r = CurlRenderer::new(CurlOptions::default());
        assert_eq!(r.current_content(), "");
        assert_eq!(r.current_url(), "");
        assert_eq!(r.last_status(), None);
    }

    #[test]
    fn unreachable_host_is_a_load_error() {
        let mut r = CurlRenderer::new(CurlOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(2),
            ..CurlOptions::default()
        });
        // Port 1 on localhost is not listening in test environments.
        assert!(r.load("http://127.0.0.1:1/").is_err());
        assert_eq!(r.current_url(), "http://127.0.0.1:1/");
    }

    #[test]
    fn default_user_agent_names_the_crate() {
        assert!(CurlOptions::default().user_agent.starts_with("polite/"));
    }
}
