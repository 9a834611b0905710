use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Network authority (host + explicit port) a crawl is restricted to
///
/// The scheme is deliberately not part of the origin: `http://example.com/`
/// and `https://example.com/` belong to the same site for classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Builds the origin of a URL
    ///
    /// # Returns
    ///
    /// * `Ok(Origin)` - The URL's host and port
    /// * `Err(UrlError::MissingHost)` - The URL has no host (e.g. `mailto:`)
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use site_sentiment::url::Origin;
    ///
    /// let url = Url::parse("https://Example.COM:8080/path").unwrap();
    /// let origin = Origin::from_url(&url).unwrap();
    /// assert_eq!(origin.to_string(), "example.com:8080");
    /// ```
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        extract_authority(url)
            .map(|(host, port)| Self { host, port })
            .ok_or(UrlError::MissingHost)
    }

    /// Returns true if the URL has exactly this host and port
    pub fn matches(&self, url: &Url) -> bool {
        match extract_authority(url) {
            Some((host, port)) => host == self.host && port == self.port,
            None => false,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// Extracts the lowercase host and explicit port from a URL
///
/// The `url` crate drops a port equal to the scheme default, so
/// `http://example.com:80/` and `https://example.com/` share an authority.
pub fn extract_authority(url: &Url) -> Option<(String, Option<u16>)> {
    url.host_str().map(|h| (h.to_lowercase(), url.port()))
}

/// Returns true if `candidate` shares the network authority of `origin`
///
/// Scheme, path, query and fragment are ignored.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_sentiment::url::is_internal;
///
/// let origin = Url::parse("https://example.com/").unwrap();
/// assert!(is_internal(&Url::parse("http://example.com/about?x=1").unwrap(), &origin));
/// assert!(!is_internal(&Url::parse("https://blog.example.com/").unwrap(), &origin));
/// ```
pub fn is_internal(candidate: &Url, origin: &Url) -> bool {
    match (extract_authority(candidate), extract_authority(origin)) {
        (Some(candidate), Some(origin)) => candidate == origin,
        _ => false,
    }
}
