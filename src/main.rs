//! Ebook-Mirror main entry point
//!
//! This is the command-line interface for the Ebook-Mirror catalog crawler.

use clap::Parser;
use ebook_mirror::config::{load_config_with_fingerprint, validate, Config};
use ebook_mirror::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ebook-Mirror: mirror a paginated e-book catalog to disk
///
/// Ebook-Mirror walks the catalog's overview pages, and for every listing
/// writes its description and downloads its files into a directory named
/// after the listing. Listings already on disk are skipped, so an
/// interrupted mirror is resumed by running the same command again.
#[derive(Parser, Debug)]
#[command(name = "ebook-mirror")]
#[command(version)]
#[command(about = "Mirror a paginated e-book catalog to disk", long_about = None)]
struct Cli {
    /// Directory the listings are mirrored into
    #[arg(value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of listings processed at once
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<u32>,

    /// Stop after this many overview pages (0 for no limit)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ebook_mirror=info,warn"),
            1 => EnvFilter::new("ebook_mirror=debug,info"),
            2 => EnvFilter::new("ebook_mirror=trace,debug"),
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

/// Builds the effective configuration: file (or defaults), then CLI overrides
///
/// Validation happens here so a bad invocation fails before any request.
fn load_configuration(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, fingerprint) = load_config_with_fingerprint(path)?;
            tracing::info!("Configuration loaded (sha256 {})", fingerprint);
            config
        }
        None => Config::default(),
    };

    if let Some(destination) = &cli.destination {
        config.output.destination = Some(destination.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_listings = concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    validate(&config)?;

    Ok(config)
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(destination) = &config.output.destination {
        tracing::info!("Mirroring into {}", destination.display());
    }

    match crawl(config).await {
        Ok(stats) if stats.listings_failed > 0 => {
            tracing::warn!(
                "Crawl completed with {} failed listings; run again to retry them",
                stats.listings_failed
            );
            Ok(())
        }
        Ok(_) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
