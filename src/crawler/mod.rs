//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with optional retry
//! - HTML parsing into title, text and hrefs
//! - Depth-first traversal under a page bound
//! - A worker pool for crawling with several fetches in flight

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Crawler;
pub use fetcher::{backoff_delay, build_http_client, fetch_url, FetchedPage, Fetcher};
pub use parser::{extract_page, ExtractedPage, NO_TITLE};

use crate::config::Config;
use crate::output::CrawlResult;
use crate::CrawlError;

/// Crawls a site from `seed_url`, visiting at most `max_pages` pages
///
/// Uses the default configuration otherwise: one worker, a 10 second fetch
/// timeout and no retries.
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Pages recorded in visit order
/// * `Err(CrawlError)` - The seed URL or `max_pages` is invalid
pub async fn crawl(seed_url: &str, max_pages: usize) -> Result<CrawlResult, CrawlError> {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;

    Crawler::new(&config)?.crawl(seed_url).await
}
