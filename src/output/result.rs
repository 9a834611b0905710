//! Crawl result types
//!
//! A [`CrawlResult`] is an ordered map from page URL to [`PageRecord`]. It
//! serializes as a JSON object whose keys keep visit order.

use crate::output::CrawlStats;
use crate::sentiment::SentenceScore;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

/// Everything recorded about one successfully fetched page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    /// The URL the page was requested under (the map key when serialized)
    #[serde(skip)]
    pub url: String,

    /// Page title, or `"No title"` when the document has none
    pub title: String,

    /// Internal links in discovery order
    pub links: Vec<String>,

    /// Per-sentence sentiment of the page text
    #[serde(rename = "sentiment_analysis")]
    pub sentiment: Vec<SentenceScore>,
}

/// Mapping from URL to PageRecord in visit order
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    pages: Vec<PageRecord>,
    stats: CrawlStats,
}

impl CrawlResult {
    /// Assembles a result from the admission order and the records produced
    ///
    /// URLs without a record (failed fetches, abandoned fetches) are skipped.
    pub fn from_visits(
        visit_order: &[String],
        mut records: HashMap<String, PageRecord>,
        stats: CrawlStats,
    ) -> Self {
        let pages = visit_order
            .iter()
            .filter_map(|url| records.remove(url))
            .collect();
        Self { pages, stats }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Looks up the record for a URL
    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    /// Records in visit order
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Keys in visit order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}

impl Serialize for CrawlResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for page in &self.pages {
            map.serialize_entry(&page.url, page)?;
        }
        map.end()
    }
}
