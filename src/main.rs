//! site-sentiment main entry point
//!
//! This is the command-line interface for the same-origin sentiment crawler.

use anyhow::Context;
use clap::Parser;
use site_sentiment::config::{load_config_with_hash, validate, Config};
use site_sentiment::output::print_statistics;
use site_sentiment::{write_json, Crawler};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file created in the working directory unless `--no-log-file` is given
const DEFAULT_LOG_FILE: &str = "site_sentiment.log";

/// site-sentiment: crawl a site and score the sentiment of its pages
///
/// Starting from SEED_URL, follows links that stay on the seed's host and
/// port, visiting at most --max-pages pages. Writes each page's title,
/// internal links and per-sentence sentiment to a JSON file keyed by URL.
#[derive(Parser, Debug)]
#[command(name = "site-sentiment")]
#[command(version)]
#[command(about = "A same-origin crawler with sentence-level sentiment", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages to visit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Number of pages fetched concurrently (1 keeps strict depth-first order)
    #[arg(long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    fetch_timeout: Option<u64>,

    /// Overall crawl timeout in seconds; partial results are still written
    #[arg(long, value_name = "SECS")]
    crawl_timeout: Option<u64>,

    /// Retries for network failures
    #[arg(long)]
    retries: Option<u32>,

    /// Output JSON path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write logs to this file (plain text, truncated on start)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log to stderr only
    #[arg(long, conflicts_with = "log_file")]
    no_log_file: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// The log file to write, unless disabled
    fn log_destination(&self) -> Option<&Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }

    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(secs) = self.fetch_timeout {
            config.crawler.fetch_timeout_secs = secs;
        }
        if let Some(secs) = self.crawl_timeout {
            config.crawler.crawl_timeout_secs = Some(secs);
        }
        if let Some(retries) = self.retries {
            config.crawler.retries = retries;
        }
        if let Some(output) = &self.output {
            config.output.path = output.display().to_string();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_destination())?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("invalid configuration")?;

    let crawler = Crawler::new(&config).context("failed to initialize crawler")?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, finishing with the pages fetched so far");
                cancel.cancel();
            }
        })
    };

    let result = crawler
        .crawl_with_cancellation(&cli.seed_url, cancel)
        .await
        .with_context(|| format!("cannot crawl {}", cli.seed_url))?;
    ctrl_c.abort();

    let output = Path::new(&config.output.path);
    write_json(&result, output)
        .with_context(|| format!("failed to write results to {}", output.display()))?;

    if !cli.quiet {
        print_statistics(result.stats());
        println!("\nResults written to: {}", output.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_sentiment=info,warn"),
            1 => EnvFilter::new("site_sentiment=debug,info"),
            2 => EnvFilter::new("site_sentiment=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
