//! Visited-set bookkeeping for a single crawl
//!
//! This module owns the admission policy: a URL is fetched at most once and
//! never after the page bound has been reached.

use crate::url::Origin;
use std::collections::HashSet;
use url::Url;

/// Mutable traversal state shared by every page of one crawl
///
/// Invariants: `page_count() == visited.len()` and
/// `page_count() <= max_pages()`. The only mutation is [`CrawlState::admit`],
/// which checks and inserts in one step so callers can never observe a URL
/// that passed the check but was not yet marked visited.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// URLs for which a fetch attempt has been made (or is in flight)
    visited: HashSet<String>,

    /// Admission order, used to order the final result
    order: Vec<String>,

    /// Fixed page bound
    max_pages: usize,

    /// Authority every admitted URL must share
    origin: Origin,
}

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The URL was marked visited and should be fetched
    Admitted,
    /// The URL was already in the visited set
    AlreadyVisited,
    /// The page bound has been reached
    BoundReached,
    /// The URL is not on the crawl origin
    External,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

impl CrawlState {
    /// Creates the state for a crawl rooted at `origin`
    pub fn new(origin: Origin, max_pages: usize) -> Self {
        Self {
            visited: HashSet::new(),
            order: Vec::new(),
            max_pages,
            origin,
        }
    }

    /// Checks "internal, not visited, under bound" and marks the URL visited
    pub fn admit(&mut self, url: &Url) -> Admission {
        self.admit_as(url.as_str(), url)
    }

    /// Like [`CrawlState::admit`], but records the URL under `key`
    ///
    /// The seed is admitted this way so its result key is the string the
    /// caller passed rather than the parsed form.
    pub fn admit_as(&mut self, key: &str, url: &Url) -> Admission {
        if !self.origin.matches(url) {
            return Admission::External;
        }

        if self.visited.contains(key) {
            return Admission::AlreadyVisited;
        }

        if self.is_exhausted() {
            return Admission::BoundReached;
        }

        self.visited.insert(key.to_string());
        self.order.push(key.to_string());
        Admission::Admitted
    }

    /// Returns true once no further URL can be admitted
    pub fn is_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn page_count(&self) -> usize {
        self.visited.len()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// URLs in the order they were admitted
    pub fn visit_order(&self) -> &[String] {
        &self.order
    }
}
