//! Lot-Harvester: used-car listing harvester
//!
//! This crate scrapes vehicle listings from a classifieds result page,
//! normalizes titles and free text into structured records, downloads the
//! listing photos and publishes everything as static-site content.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod images;
pub mod infer;
pub mod intent;
pub mod listing;
pub mod output;
pub mod state;
pub mod text;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Failed to load {url}: {source}")]
    Navigation { url: String, source: BrowserError },

    #[error("Item has no {field}")]
    MissingField { field: &'static str },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

/// Browser session errors
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("No element matches {0}")]
    NoSuchElement(String),

    #[error("Invalid selector {0}")]
    Selector(String),

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Browser command failed: {0}")]
    Command(String),

    #[error("No browser window is selected")]
    NoWindow,

    #[error("Script failed: {0}")]
    Script(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

/// Image download errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Request to {url} failed: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// Result type alias for image downloads
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{harvest, CrawlReport};
pub use listing::{BrandRegistry, ListingRecord};
pub use state::CrawlState;
