//! Site-Trawl main entry point
//!
//! This is the command-line interface for the Site-Trawl content crawler.

use anyhow::Context;
use clap::Parser;
use site_trawl::config::{load_config_with_hash, Config};
use site_trawl::CrawlerBuilder;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Trawl: a single-domain content crawler
///
/// Site-Trawl walks one website from a seed URL, extracts the readable text
/// of every page it can reach and writes one JSON record per page.
#[derive(Parser, Debug)]
#[command(name = "site-trawl")]
#[command(version)]
#[command(about = "A single-domain content crawler", long_about = None)]
struct Cli {
    /// Seed URL; its scheme and host define the domain that is crawled
    #[arg(long = "input-url", value_name = "URL")]
    input_url: String,

    /// Path of the JSON Lines file to write
    #[arg(long = "outputpath", value_name = "PATH")]
    output_path: PathBuf,

    /// Maximum link depth from the seed (seed is depth 0)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to write
    #[arg(long)]
    max_pages: Option<u64>,

    /// Minimum delay between two requests, in milliseconds
    #[arg(long)]
    min_request_interval_ms: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_depth) = self.max_depth {
            config.crawler.max_depth = Some(max_depth);
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = Some(max_pages);
        }
        if let Some(interval) = self.min_request_interval_ms {
            config.fetcher.min_request_interval_ms = interval;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    // The seed also defines the domain root
    let mut crawler = CrawlerBuilder::new(&cli.input_url, &cli.input_url, &cli.output_path)
        .with_config(&config)
        .build()
        .with_context(|| format!("cannot crawl {}", cli.input_url))?;

    let token = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing current page");
            token.cancel();
        }
    });

    let stats = crawler.crawl().await.context("crawl failed")?;
    tracing::info!(
        "Wrote {} pages to {}",
        stats.pages_written,
        cli.output_path.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_trawl=info,warn"),
            1 => EnvFilter::new("site_trawl=debug,info"),
            2 => EnvFilter::new("site_trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
