//! Configuration module for Arenda-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every knob the engines consume (delays, timeout, checkpoint
//! cadence, page limit, district table) lives here as explicit immutable
//! configuration; the engines take a `Config` at construction and read
//! nothing ambient.
//!
//! A configuration file is optional: `Config::default()` carries the full
//! district table and the delay/timeout values the harvester ships with.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Validation is applied by the parser; exported for default-config checks.
pub use validation::validate;
