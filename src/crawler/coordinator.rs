//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal that ties the crawl together:
//! - Validating the seed and deriving the crawl origin
//! - Admitting URLs into the visited set under the page bound
//! - Fetching, extracting and classifying links for each page
//! - Scoring page text and assembling the result
//! - Honoring cancellation and the overall crawl timeout

use crate::config::{validate, Config, CrawlerConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_page;
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlResult, CrawlStats, PageRecord};
use crate::sentiment::SentimentScorer;
use crate::state::CrawlState;
use crate::url::{classify_links, parse_seed, DiscoveredLinks, Origin, Seed};
use crate::CrawlError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A fetched and parsed page that has not been scored yet
#[derive(Debug, Clone)]
pub(crate) struct OpenPage {
    /// Result key: the seed string as given, or the resolved link
    pub key: String,
    pub url: Url,
    pub title: String,
    pub text: String,
    pub links: DiscoveredLinks,
}

/// Fetches a page and extracts everything the crawl needs from it
///
/// The HTML document is parsed after the last await point so the future
/// stays `Send` and can run on a worker task.
pub(crate) async fn load_page(
    fetcher: &Fetcher,
    key: String,
    url: Url,
    origin: &Origin,
) -> Result<OpenPage, CrawlError> {
    let fetched = fetcher.fetch(&url).await?;
    tracing::debug!(
        "Fetched {} (status {}, final URL {})",
        url,
        fetched.status_code,
        fetched.final_url
    );

    let extracted = extract_page(&fetched.body);
    let links = classify_links(&url, extracted.hrefs.iter().map(String::as_str), origin);
    let title = extracted.title_or_default().to_string();

    Ok(OpenPage {
        key,
        url,
        title,
        text: extracted.text,
        links,
    })
}

/// Scores a page's text and turns it into its final record
pub(crate) fn close_page(scorer: &SentimentScorer, page: OpenPage) -> PageRecord {
    PageRecord {
        sentiment: scorer.score(&page.text),
        url: page.key,
        title: page.title,
        links: page
            .links
            .internal
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

/// One page on the depth-first stack, with a cursor into its links
struct Frame {
    page: OpenPage,
    cursor: usize,
}

impl Frame {
    fn new(page: OpenPage) -> Self {
        Self { page, cursor: 0 }
    }

    /// Advances to the next link of this page
    fn next_link(&mut self) -> Option<Url> {
        let link = self.page.links.internal.get(self.cursor).cloned();
        if link.is_some() {
            self.cursor += 1;
        }
        link
    }
}

/// Outcome of visiting one admitted URL
enum Visit {
    Opened(OpenPage),
    Failed,
    Cancelled,
}

/// Main crawler structure
///
/// Built once at startup: construction validates the configuration, builds
/// the HTTP client and loads the sentiment lexicon, so every startup error
/// surfaces before the first request.
pub struct Crawler {
    pub(crate) config: CrawlerConfig,
    pub(crate) fetcher: Fetcher,
    pub(crate) scorer: Arc<SentimentScorer>,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlError)` - Invalid configuration, HTTP client or lexicon
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        validate(config)?;

        let fetcher = Fetcher::new(&config.crawler, &config.user_agent)?;
        let scorer = SentimentScorer::from_config(&config.sentiment)?;

        Ok(Self {
            config: config.crawler.clone(),
            fetcher,
            scorer: Arc::new(scorer),
        })
    }

    /// Crawls from `seed` until every reachable page is handled
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Crawl finished or timed out (partial result)
    /// * `Err(CrawlError)` - The seed URL is invalid
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_sentiment::{Config, Crawler};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let crawler = Crawler::new(&Config::default())?;
    /// let result = crawler.crawl("https://example.com/").await?;
    /// println!("Recorded {} pages", result.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, seed: &str) -> Result<CrawlResult, CrawlError> {
        self.crawl_with_cancellation(seed, CancellationToken::new()).await
    }

    /// Crawls from `seed`, stopping early if `cancel` fires or the configured
    /// crawl timeout elapses
    ///
    /// On cancellation the in-flight fetch is abandoned and every page that
    /// was already fetched is still scored and returned.
    pub async fn crawl_with_cancellation(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlResult, CrawlError> {
        let cancel = cancel.child_token();

        let timer = self.config.crawl_timeout_secs.map(|secs| {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(secs)).await;
                tracing::warn!("Crawl timeout of {}s reached, cancelling", secs);
                token.cancel();
            })
        });

        let result = self.run(seed, &cancel).await;

        if let Some(timer) = timer {
            timer.abort();
        }
        result
    }

    async fn run(
        &self,
        seed: &str,
        cancel: &CancellationToken,
    ) -> Result<CrawlResult, CrawlError> {
        let seed = parse_seed(seed)?;
        let origin = Origin::from_url(&seed.url)?;
        let mut state = CrawlState::new(origin, self.config.max_pages);
        let mut stats = CrawlStats::new();

        tracing::info!(
            "Starting crawl of {} (origin {}, max {} pages, {} worker(s))",
            seed.raw,
            state.origin(),
            self.config.max_pages,
            self.config.workers
        );

        let records = if self.config.workers > 1 {
            Scheduler::new(self.config.workers)
                .run(self, seed, &mut state, &mut stats, cancel)
                .await
        } else {
            self.crawl_depth_first(seed, &mut state, &mut stats, cancel)
                .await
        };

        stats.pages_visited = state.page_count();
        stats.pages_recorded = records.len();
        stats.finish();

        tracing::info!(
            "Crawl {}: {} pages visited, {} recorded, {} failed{}",
            if stats.cancelled { "cancelled" } else { "completed" },
            stats.pages_visited,
            stats.pages_recorded,
            stats.failed_pages(),
            stats
                .duration()
                .map(|d| format!(" in {}ms", d.num_milliseconds()))
                .unwrap_or_default()
        );

        Ok(CrawlResult::from_visits(state.visit_order(), records, stats))
    }

    /// Sequential depth-first traversal with an explicit stack
    ///
    /// A child is admitted and fetched as soon as its link is reached, before
    /// the parent's next link is considered. A page is scored once all of its
    /// links have been handled.
    async fn crawl_depth_first(
        &self,
        seed: Seed,
        state: &mut CrawlState,
        stats: &mut CrawlStats,
        cancel: &CancellationToken,
    ) -> HashMap<String, PageRecord> {
        let mut records = HashMap::new();
        let mut stack: Vec<Frame> = Vec::new();

        let mut next = state
            .admit_as(&seed.raw, &seed.url)
            .is_admitted()
            .then_some((seed.raw, seed.url));

        loop {
            if let Some((key, url)) = next.take() {
                match self.visit(key, url, state.origin(), stats, cancel).await {
                    Visit::Opened(page) => stack.push(Frame::new(page)),
                    Visit::Failed => {}
                    Visit::Cancelled => {
                        stats.cancelled = true;
                        break;
                    }
                }
            }

            let Some(frame) = stack.last_mut() else {
                break;
            };

            match frame.next_link() {
                Some(link) => {
                    if state.admit(&link).is_admitted() {
                        next = Some((link.to_string(), link));
                    }
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        let record = close_page(&self.scorer, frame.page);
                        records.insert(record.url.clone(), record);
                    }
                }
            }
        }

        // Pages fetched before a cancellation still get a record
        while let Some(frame) = stack.pop() {
            let record = close_page(&self.scorer, frame.page);
            records.insert(record.url.clone(), record);
        }

        records
    }

    /// Fetches one admitted URL, racing it against cancellation
    async fn visit(
        &self,
        key: String,
        url: Url,
        origin: &Origin,
        stats: &mut CrawlStats,
        cancel: &CancellationToken,
    ) -> Visit {
        tracing::info!("Crawling: {}", key);

        let loaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Visit::Cancelled,
            loaded = load_page(&self.fetcher, key.clone(), url, origin) => loaded,
        };

        match loaded {
            Ok(page) => {
                stats.record_links(&page.links);
                Visit::Opened(page)
            }
            Err(e) => {
                stats.record_failure(&e);
                tracing::error!("Failed to crawl {}: {}", key, e);
                Visit::Failed
            }
        }
    }
}
