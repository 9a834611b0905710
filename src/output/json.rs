//! JSON output generation
//!
//! The crawl result is written as a single pretty-printed object:
//!
//! ```text
//! {
//!   "https://example.com/": {
//!     "title": "Example Domain",
//!     "links": ["https://example.com/about"],
//!     "sentiment_analysis": [
//!       { "text": "...", "polarity": 0.0, "subjectivity": 0.0 }
//!     ]
//!   }
//! }
//! ```

use crate::output::CrawlResult;
use crate::CrawlError;
use std::path::Path;

/// Serializes a crawl result to a pretty-printed JSON string (2-space indent)
pub fn to_json_string(result: &CrawlResult) -> Result<String, CrawlError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes a crawl result to `path` as UTF-8 JSON
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(CrawlError::Io)` - The destination could not be written
pub fn write_json(result: &CrawlResult, path: &Path) -> Result<(), CrawlError> {
    let mut json = to_json_string(result)?;
    json.push('\n');

    std::fs::write(path, json)?;

    tracing::info!(
        "Wrote {} page records to {}",
        result.len(),
        path.display()
    );
    Ok(())
}
