//! Arenda-Harvest main entry point
//!
//! Command-line interface for the rental-listing harvester: full pipeline
//! by default, or a single stage via `--scrape-only` / `--clean-only` /
//! `--details-only`.

use arenda_harvest::config::{load_config_with_hash, Config};
use arenda_harvest::pipeline::Pipeline;
use arenda_harvest::ConfigError;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Arenda-Harvest: a rental-listing harvester
///
/// Crawls per-district listing pages from an OLX-style classifieds site,
/// cleans the scraped sets, and fetches per-listing detail records with
/// resumable, checkpointed output.
#[derive(Parser, Debug)]
#[command(name = "arenda-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Rental-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (embedded defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Only run the listing scrape stage
    #[arg(long, conflicts_with_all = ["clean_only", "details_only"])]
    scrape_only: bool,

    /// Only run the cleaning stage
    #[arg(long, conflicts_with_all = ["scrape_only", "details_only"])]
    clean_only: bool,

    /// Only run the detail scrape stage
    #[arg(long, conflicts_with_all = ["scrape_only", "clean_only"])]
    details_only: bool,

    /// Maximum pages to scrape per district (overrides configuration)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Comma-separated district ids to process (default: all)
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    districts: Option<Vec<u32>>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(max_pages) = cli.max_pages {
        config.fetch.max_pages = max_pages;
    }

    let pipeline = Pipeline::new(config, cli.districts.as_deref());
    if pipeline.districts().is_empty() {
        tracing::error!("No configured district matches the requested ids");
        return ExitCode::from(1);
    }
    tracing::info!("Processing {} districts", pipeline.districts().len());

    let success = if cli.scrape_only {
        match pipeline.run_scrape().await {
            Ok(report) => report.success(),
            Err(e) => {
                tracing::error!("Scrape failed: {}", e);
                false
            }
        }
    } else if cli.clean_only {
        match pipeline.run_clean() {
            Ok(report) => report.success(),
            Err(e) => {
                tracing::error!("Cleaning failed: {}", e);
                false
            }
        }
    } else if cli.details_only {
        match pipeline.run_details().await {
            Ok(report) => report.success(),
            Err(e) => {
                tracing::error!("Detail scrape failed: {}", e);
                false
            }
        }
    } else {
        match pipeline.run_full().await {
            Ok(report) => report.success(),
            Err(e) => {
                tracing::error!("Pipeline failed: {}", e);
                false
            }
        }
    };

    if success {
        tracing::info!("Run completed successfully");
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("arenda_harvest=info,warn"),
            1 => EnvFilter::new("arenda_harvest=debug,info"),
            2 => EnvFilter::new("arenda_harvest=trace,debug"),
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

/// Loads the configuration file, or the embedded defaults when none is
/// given. The file's hash is logged so a run's output can be traced back
/// to the exact configuration that produced it.
fn load_configuration(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!(
                "Configuration loaded from {} (hash: {})",
                path.display(),
                hash
            );
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using embedded defaults");
            Ok(Config::default())
        }
    }
}
