//! Crawl statistics
//!
//! Counters collected while crawling. They travel with the [`CrawlResult`]
//! but are never written to the JSON output.
//!
//! [`CrawlResult`]: crate::output::CrawlResult

use crate::url::DiscoveredLinks;
use crate::CrawlError;
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStats {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished (or was cancelled)
    pub finished_at: Option<DateTime<Utc>>,

    /// URLs admitted to the visited set
    pub pages_visited: usize,

    /// Pages that produced a record
    pub pages_recorded: usize,

    /// Fetches that failed at the transport level
    pub network_errors: usize,

    /// Fetches that returned a non-success status
    pub http_errors: usize,

    /// Internal links kept across all pages
    pub internal_links: usize,

    /// External links dropped across all pages
    pub external_links: usize,

    /// Hrefs that could not be resolved to an http(s) URL
    pub unresolved_links: usize,

    /// True if the crawl was cut short by cancellation
    pub cancelled: bool,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    /// Starts a fresh set of counters stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            pages_recorded: 0,
            network_errors: 0,
            http_errors: 0,
            internal_links: 0,
            external_links: 0,
            unresolved_links: 0,
            cancelled: false,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Counts the links discovered on one page
    pub fn record_links(&mut self, links: &DiscoveredLinks) {
        self.internal_links += links.internal.len();
        self.external_links += links.external;
        self.unresolved_links += links.unresolved;
    }

    /// Counts a failed page fetch by kind
    ///
    /// Anything other than a non-success status counts as a network failure.
    pub fn record_failure(&mut self, error: &CrawlError) {
        match error {
            CrawlError::HttpStatus { .. } => self.http_errors += 1,
            _ => self.network_errors += 1,
        }
    }

    /// Total failed fetches
    pub fn failed_pages(&self) -> usize {
        self.network_errors + self.http_errors
    }

    /// Wall-clock duration, if the crawl has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Pages recorded: {}", stats.pages_recorded);
    println!(
        "  Failed fetches: {} (network: {}, http status: {})",
        stats.failed_pages(),
        stats.network_errors,
        stats.http_errors
    );
    println!();

    println!("Links:");
    println!("  Internal: {}", stats.internal_links);
    println!("  External (dropped): {}", stats.external_links);
    println!("  Unresolved (dropped): {}", stats.unresolved_links);
    println!();

    if let Some(duration) = stats.duration() {
        println!(
            "Duration: {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );
    }

    if stats.cancelled {
        println!("Crawl was cancelled; results are partial");
    }
}
