//! Hubcrawl: a hub-driven domain crawler worker
//!
//! This crate implements the worker side of a distributed crawler. A worker
//! requests batches of domains from a central hub, crawls each domain inside
//! its own host boundary, extracts text, links and images per page, and
//! submits one aggregated result per domain back to the hub.

pub mod config;
pub mod crawler;
pub mod hub;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Hubcrawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Document parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Cannot form a root URL for domain '{domain}': {reason}")]
    DomainResolution { domain: String, reason: String },

    #[error("Failed to submit crawl data for {domain}: {reason}")]
    Submission { domain: String, reason: String },

    #[error("Crawl of {domain} was cancelled")]
    Cancelled { domain: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Hubcrawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlSession, DomainCrawler, Fetcher, HttpFetcher};
pub use hub::HubClient;
pub use state::{CrawlPhase, DomainData, Image, PageContent};
pub use crate::url::{resolve_link, root_url};
