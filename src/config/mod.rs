//! Configuration module for Hubcrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use hubcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hubcrawl.toml")).unwrap();
//! println!("Hub: {}", config.hub.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HubConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
