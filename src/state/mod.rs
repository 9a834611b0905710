//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the visited set, page bound and crawl origin
//! - `Admission`: why a URL was or was not admitted for fetching

mod crawl_state;

pub use crawl_state::{Admission, CrawlState};
