//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only `[crawler] listing-url` is required; every other key has a default.
//!
//! # Example
//!
//! ```no_run
//! use lot_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting {}", config.crawler.listing_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserBackend, BrowserConfig, Config, CrawlerConfig, ImagesConfig, OutputConfig,
    UserAgentConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
