//! URL handling module
//!
//! This module resolves hrefs against their page, classifies the result as
//! internal or external to the crawl origin, and validates seed URLs.

mod origin;
mod resolve;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use origin::{extract_authority, is_internal, Origin};
pub use resolve::{classify_links, resolve_link, try_resolve_link, DiscoveredLinks};

/// A validated seed URL
///
/// `raw` is the string the caller passed (trimmed) and is used as the seed's
/// result key. `url` is the parsed form, used for link joining and the crawl
/// origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub raw: String,
    pub url: Url,
}

/// Parses and validates a seed URL
///
/// The seed must be an absolute http(s) URL with a host, since its authority
/// becomes the crawl origin.
///
/// # Examples
///
/// ```
/// use site_sentiment::url::parse_seed;
///
/// let seed = parse_seed("https://example.com").unwrap();
/// assert_eq!(seed.raw, "https://example.com");
/// assert_eq!(seed.url.as_str(), "https://example.com/");
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("not a url").is_err());
/// ```
pub fn parse_seed(seed: &str) -> UrlResult<Seed> {
    let raw = seed.trim();
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(Seed {
        raw: raw.to_string(),
        url,
    })
}
