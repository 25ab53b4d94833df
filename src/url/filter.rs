use crate::url::{normalize_url, DomainRoot};
use url::Url;

/// Schemes that never point at a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

/// Path keywords denied by default
pub const DEFAULT_DENIED_PATH_KEYWORDS: &[&str] = &["login", "tag"];

/// Path policy applied to every discovered link
///
/// A link is denied when its lowercased path contains any of the keywords
/// as a substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    denied_path_keywords: Vec<String>,
}

impl LinkPolicy {
    /// Creates a policy denying paths that contain any of `keywords`
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denied_path_keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// A policy that admits every same-domain path
    pub fn allow_all() -> Self {
        Self {
            denied_path_keywords: Vec::new(),
        }
    }

    /// Returns the denied keywords
    pub fn denied_path_keywords(&self) -> &[String] {
        &self.denied_path_keywords
    }

    /// Returns true when the URL path is admissible
    pub fn allows(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();
        !self
            .denied_path_keywords
            .iter()
            .any(|keyword| path.contains(keyword.as_str()))
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DENIED_PATH_KEYWORDS)
    }
}

/// Turns a raw href into a canonical, same-domain, policy-admitted URL
///
/// Returns None if the link should be dropped:
/// - empty hrefs
/// - `javascript:`, `mailto:` and `tel:` links
/// - hrefs that cannot be resolved against `base_url`
/// - URLs outside of `root`
/// - URLs whose path is denied by `policy`
///
/// # Examples
///
/// ```
/// use site_trawl::url::{domain_root, resolve_and_filter, LinkPolicy};
/// use url::Url;
///
/// let root = domain_root("https://example.com/").unwrap();
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let policy = LinkPolicy::default();
///
/// let url = resolve_and_filter("../about", &base, &root, &policy).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about/");
/// assert!(resolve_and_filter("mailto:a@b.com", &base, &root, &policy).is_none());
/// ```
pub fn resolve_and_filter(
    href: &str,
    base_url: &Url,
    root: &DomainRoot,
    policy: &LinkPolicy,
) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    let normalized = normalize_url(absolute.as_str()).ok()?;

    if !root.contains(&normalized) {
        return None;
    }

    if !policy.allows(&normalized) {
        return None;
    }

    Some(normalized)
}
