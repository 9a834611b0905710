//! Scheduler for crawling with several fetches in flight
//!
//! This module handles:
//! - A LIFO worklist of admitted URLs, so the crawl stays roughly depth-first
//! - A bounded pool of worker tasks
//! - Admitting discovered links as each page completes
//! - Cancellation, keeping pages that finished before it fired
//!
//! Admission only ever happens on the scheduling task, so the visited set
//! has a single owner and the page bound holds without locking.

use crate::crawler::coordinator::{close_page, load_page, Crawler};
use crate::output::{CrawlStats, PageRecord};
use crate::state::CrawlState;
use crate::url::{DiscoveredLinks, Seed};
use crate::CrawlError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use url::Url;

/// A page scored on a worker, with the links still to be admitted
#[derive(Debug)]
struct ScoredPage {
    record: PageRecord,
    links: DiscoveredLinks,
}

/// Result key and fetch outcome of one task
type TaskOutput = (String, Result<ScoredPage, CrawlError>);

/// Worker pool driving a concurrent crawl
pub(crate) struct Scheduler {
    /// Maximum tasks in flight
    workers: usize,

    /// Admitted (key, URL) pairs waiting for a worker, popped from the back
    pending: Vec<(String, Url)>,

    /// Pages recorded so far, keyed by URL
    records: HashMap<String, PageRecord>,
}

impl Scheduler {
    pub(crate) fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            pending: Vec::new(),
            records: HashMap::new(),
        }
    }

    /// Runs the crawl to completion or cancellation
    pub(crate) async fn run(
        mut self,
        crawler: &Crawler,
        seed: Seed,
        state: &mut CrawlState,
        stats: &mut CrawlStats,
        cancel: &CancellationToken,
    ) -> HashMap<String, PageRecord> {
        if state.admit_as(&seed.raw, &seed.url).is_admitted() {
            self.pending.push((seed.raw, seed.url));
        }

        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();

        loop {
            while tasks.len() < self.workers {
                let Some((key, url)) = self.pending.pop() else {
                    break;
                };
                self.spawn(&mut tasks, crawler, state, key, url);
            }

            if tasks.is_empty() {
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    stats.cancelled = true;
                    break;
                }
                joined = tasks.join_next() => joined,
            };

            match joined {
                Some(joined) => self.complete(joined, Some(&mut *state), stats),
                None => break,
            }
        }

        if stats.cancelled {
            tracing::debug!(
                "Cancelling {} in-flight fetch(es), {} admitted URL(s) never started",
                tasks.len(),
                self.pending.len()
            );
            tasks.abort_all();

            // Tasks that finished before the abort still yield their page
            while let Some(joined) = tasks.join_next().await {
                self.complete(joined, None, stats);
            }
        }

        self.records
    }

    fn spawn(
        &self,
        tasks: &mut JoinSet<TaskOutput>,
        crawler: &Crawler,
        state: &CrawlState,
        key: String,
        url: Url,
    ) {
        tracing::info!("Crawling: {}", key);

        let fetcher = crawler.fetcher.clone();
        let scorer = Arc::clone(&crawler.scorer);
        let origin = state.origin().clone();

        tasks.spawn(async move {
            let result = load_page(&fetcher, key.clone(), url, &origin)
                .await
                .map(|page| {
                    let links = page.links.clone();
                    ScoredPage {
                        record: close_page(&scorer, page),
                        links,
                    }
                });
            (key, result)
        });
    }

    /// Handles one finished task
    ///
    /// Links are admitted only while `state` is given; after cancellation
    /// nothing new is admitted.
    fn complete(
        &mut self,
        joined: Result<TaskOutput, JoinError>,
        state: Option<&mut CrawlState>,
        stats: &mut CrawlStats,
    ) {
        let (key, result) = match joined {
            Ok(output) => output,
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                tracing::error!("Crawl task failed: {}", e);
                return;
            }
        };

        match result {
            Ok(scored) => {
                stats.record_links(&scored.links);

                if let Some(state) = state {
                    let admitted: Vec<Url> = scored
                        .links
                        .internal
                        .into_iter()
                        .filter(|link| state.admit(link).is_admitted())
                        .collect();
                    // Reversed so the first link on the page is popped first
                    self.pending.extend(
                        admitted
                            .into_iter()
                            .rev()
                            .map(|link| (link.to_string(), link)),
                    );
                }

                self.records
                    .insert(scored.record.url.clone(), scored.record);
            }
            Err(e) => {
                stats.record_failure(&e);
                tracing::error!("Failed to crawl {}: {}", key, e);
            }
        }
    }
}
