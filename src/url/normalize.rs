use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into its canonical crawl key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or host-less
/// 2. Lowercase the scheme and host (done by the parser)
/// 3. Drop the default port for the scheme (done by the parser)
/// 4. Remove the fragment
/// 5. Append a trailing slash when the last path segment has no dot
///    (no file extension) and the path does not end with one already
/// 6. Keep the query string as is
///
/// The result is idempotent: normalizing a normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use site_trawl::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.com:80/docs#intro").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/docs/");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => UrlError::MissingScheme(url_str.to_string()),
        other => UrlError::Parse(format!("{}: {}", url_str, other)),
    })?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain(url_str.to_string()));
    }

    url.set_fragment(None);

    if let Some(path) = slash_terminated_path(url.path()) {
        url.set_path(&path);
    }

    Ok(url)
}

/// Returns the path with a trailing slash appended, or None if it needs none
fn slash_terminated_path(path: &str) -> Option<String> {
    if path.is_empty() {
        return Some("/".to_string());
    }
    if path.ends_with('/') {
        return None;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    if last_segment.contains('.') {
        None
    } else {
        Some(format!("{}/", path))
    }
}
