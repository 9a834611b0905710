//! Output module for crawl results
//!
//! This module handles:
//! - The result types produced by a crawl
//! - Writing the result as JSON
//! - Recording crawl statistics

mod json;
mod result;
pub mod stats;

pub use json::{to_json_string, write_json};
pub use result::{CrawlResult, PageRecord};
pub use stats::{print_statistics, CrawlStats};
