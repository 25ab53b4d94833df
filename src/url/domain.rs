use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// The scheme + host (+ non-default port) boundary of a crawl
///
/// Always rendered with a trailing slash, e.g. `https://example.com/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRoot {
    url: Url,
}

impl DomainRoot {
    /// Returns the root as a URL (`scheme://host[:port]/`)
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the root as a string slice
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns true when `url` has the same scheme, host and port as this root
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.url.scheme()
            && url.host_str() == self.url.host_str()
            && url.port() == self.url.port()
    }
}

impl fmt::Display for DomainRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Extracts the domain root of a URL
///
/// The scheme and host are lowercased and a default port for the scheme is
/// dropped by the URL parser itself.
///
/// # Examples
///
/// ```
/// use site_trawl::url::domain_root;
///
/// let root = domain_root("https://Example.COM/some/page").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/");
/// ```
pub fn domain_root(raw: &str) -> UrlResult<DomainRoot> {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Err(UrlError::MissingScheme(raw.to_string()))
        }
        Err(e) => return Err(UrlError::Parse(format!("{}: {}", raw, e))),
    };

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| UrlError::MissingDomain(raw.to_string()))?;

    let root = match parsed.port() {
        Some(port) => format!("{}://{}:{}/", parsed.scheme(), host, port),
        None => format!("{}://{}/", parsed.scheme(), host),
    };

    let url = Url::parse(&root).map_err(|e| UrlError::Parse(format!("{}: {}", root, e)))?;
    Ok(DomainRoot { url })
}
