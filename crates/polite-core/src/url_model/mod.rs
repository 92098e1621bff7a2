//! Local file names for saved pages.
//!
//! A page is stored as `<stem>-<hash>.html`, where the stem is a readable,
//! sanitized rendering of host and path, and the hash is a SHA-256 prefix
//! of the full URL so that URLs differing only in query string or in
//! characters lost to sanitizing never collide.

mod path;
mod sanitize;

pub use path::stem_from_url;
pub use sanitize::sanitize_file_stem;

use sha2::{Digest, Sha256};

/// Stem used when the URL yields nothing readable.
const DEFAULT_STEM: &str = "page";

/// Hex characters of the URL hash kept in the file name.
const HASH_CHARS: usize = 12;

/// File name for the page fetched from `url`.
///
/// # Examples
///
/// - `page_file_name("https://example.com/docs/intro")` → `"example.com_docs_intro-<hash>.html"`
/// - `page_file_name("not a url")` → `"page-<hash>.html"`
pub fn page_file_name(url: &str) -> String {
    let stem = stem_from_url(url)
        .map(|s| sanitize_file_stem(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());
    format!("{}-{}.html", stem, url_hash(url))
}

fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_CHARS);
    hex
}
