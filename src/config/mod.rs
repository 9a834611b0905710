//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key is optional, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use site_sentiment::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SentimentConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_RETRIES, MAX_WORKERS};
