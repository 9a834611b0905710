//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests to fetch page content
//! - Error classification (transport failure vs. non-success status)
//! - Optional bounded retry with exponential backoff for transport failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Upper bound for a single retry delay
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Connect timeout never exceeds this, even with a long fetch timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code (always 2xx)
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetch_timeout` - Total timeout applied to every request
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use site_sentiment::config::UserAgentConfig;
/// use site_sentiment::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(fetch_timeout)
        .connect_timeout(fetch_timeout.min(MAX_CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection refused, DNS failure, timeout | `CrawlError::Network` |
/// | Body could not be read | `CrawlError::Network` |
/// | Non-2xx status | `CrawlError::HttpStatus` (body discarded) |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedPage, CrawlError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| CrawlError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response
        .text()
        .await
        .map_err(|source| CrawlError::Network {
            url: url.to_string(),
            source,
        })?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

/// Exponential backoff delay for the given retry attempt (0-based)
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.min(20)));
    Duration::from_millis(delay).min(MAX_BACKOFF)
}

/// Page fetcher with a shared connection pool
///
/// Cloning is cheap; clones share the underlying client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retries: u32,
    retry_base_ms: u64,
}

impl Fetcher {
    /// Creates a fetcher from the crawler and user agent settings
    pub fn new(config: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(
            user_agent,
            Duration::from_secs(config.fetch_timeout_secs),
        )?;

        Ok(Self {
            client,
            retries: config.retries,
            retry_base_ms: config.retry_base_ms,
        })
    }

    /// Fetches a URL, retrying transport failures up to the configured limit
    ///
    /// Non-success statuses are returned immediately.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let mut attempt = 0;

        loop {
            match fetch_url(&self.client, url).await {
                Err(CrawlError::Network { source, .. }) if attempt < self.retries => {
                    let delay = backoff_delay(self.retry_base_ms, attempt);
                    tracing::warn!(
                        "Network error for {} (attempt {}/{}): {}; retrying in {:?}",
                        url,
                        attempt + 1,
                        self.retries + 1,
                        source,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
