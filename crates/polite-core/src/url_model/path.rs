//! Readable stem from a URL's host and path.

/// Joins host and non-empty path segments with `_`.
///
/// Returns `None` if the URL cannot be parsed or has no host.
pub fn stem_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let mut parts = vec![host];
    parts.extend(
        parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != ".."),
    );
    Some(parts.join("_"))
}
