use crate::url::Origin;
use crate::CrawlError;
use std::collections::HashSet;
use url::Url;

/// Links discovered on one page, split by classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredLinks {
    /// Internal links in document order, first occurrence only
    pub internal: Vec<Url>,

    /// Number of anchors pointing off-origin
    pub external: usize,

    /// Number of anchors that did not resolve to an http(s) URL
    pub unresolved: usize,
}

/// Resolves an href against the page it appears on
///
/// Standard URL joining applies: relative paths, absolute paths,
/// scheme-relative references and fragment-only references (which resolve to
/// the base page with the fragment attached).
///
/// Returns `None` if the href cannot be parsed or does not resolve to an
/// http(s) URL (`javascript:`, `mailto:`, `tel:`, `data:` and so on).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_sentiment::url::resolve_link;
///
/// let base = Url::parse("https://example.com/docs/page").unwrap();
/// assert_eq!(
///     resolve_link(&base, "other").unwrap().as_str(),
///     "https://example.com/docs/other"
/// );
/// assert_eq!(
///     resolve_link(&base, "#intro").unwrap().as_str(),
///     "https://example.com/docs/page#intro"
/// );
/// assert!(resolve_link(&base, "mailto:me@example.com").is_none());
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    try_resolve_link(base, href).ok()
}

/// Like [`resolve_link`], but says why an href was rejected
///
/// # Returns
///
/// * `Ok(Url)` - An absolute http(s) URL
/// * `Err(CrawlError::Parse)` - The href is unparsable or uses another scheme
pub fn try_resolve_link(base: &Url, href: &str) -> Result<Url, CrawlError> {
    let href = href.trim();

    let absolute_url = base.join(href).map_err(|e| CrawlError::Parse {
        url: base.to_string(),
        message: format!("cannot resolve href {:?}: {}", href, e),
    })?;

    // Only accept HTTP and HTTPS URLs
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return Err(CrawlError::Parse {
            url: base.to_string(),
            message: format!(
                "href {:?} has unsupported scheme {}",
                href,
                absolute_url.scheme()
            ),
        });
    }

    Ok(absolute_url)
}

/// Resolves and classifies every href found on a page
///
/// External links are counted but not kept. Duplicate internal links keep
/// their first position.
pub fn classify_links<'a, I>(base: &Url, hrefs: I, origin: &Origin) -> DiscoveredLinks
where
    I: IntoIterator<Item = &'a str>,
{
    let mut links = DiscoveredLinks::default();
    let mut seen = HashSet::new();

    for href in hrefs {
        let resolved = match try_resolve_link(base, href) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::debug!("Dropping link: {}", e);
                links.unresolved += 1;
                continue;
            }
        };

        if !origin.matches(&resolved) {
            links.external += 1;
            continue;
        }

        if seen.insert(resolved.as_str().to_string()) {
            links.internal.push(resolved);
        }
    }

    links
}
