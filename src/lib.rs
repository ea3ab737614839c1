//! Arenda-Harvest: a rental-listing harvester for OLX-style classifieds
//!
//! This crate crawls per-district listing pages, normalizes Russian-language
//! text fields (prices, relative dates, areas) into structured values, and
//! fetches per-listing detail records with resumable, checkpointed output.

pub mod cleaning;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod storage;

use thiserror::Error;

/// Main error type for harvest operations
///
/// Transport failures and bad HTTP statuses are deliberately *not* errors:
/// they terminate a page or item, never a batch, and surface as counters
/// (see `crawler::FetchOutcome`). This enum covers the genuinely fatal
/// cases: configuration, filesystem, CSV, and client construction.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No input files found in {0}")]
    EmptyInput(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{CardRef, Condition, District, Furniture, ListingDetail, ListingSummary};
