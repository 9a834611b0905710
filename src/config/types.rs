use serde::Deserialize;

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub sentiment: SentimentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of URLs admitted to the visited set
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Number of pages processed concurrently (1 keeps depth-first order)
    pub workers: usize,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Overall crawl timeout (seconds); the partial result is kept
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: Option<u64>,

    /// Retries for network failures (HTTP status failures are never retried)
    pub retries: u32,

    /// Base delay for exponential retry backoff (milliseconds)
    #[serde(rename = "retry-base-ms")]
    pub retry_base_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            workers: 1,
            fetch_timeout_secs: 10,
            crawl_timeout_secs: None,
            retries: 0,
            retry_base_ms: 500,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON result file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "links.json".to_string(),
        }
    }
}

/// Sentiment scorer configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Optional TOML lexicon merged over the built-in word list
    #[serde(rename = "lexicon-path")]
    pub lexicon_path: Option<String>,
}
