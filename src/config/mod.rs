//! Configuration module for Sitegraph
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` describes the reference crawler
//! (one-minute request timeout, no concurrency cap).
//!
//! # Example
//!
//! ```no_run
//! use sitegraph::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitegraph.toml")).unwrap();
//! println!("Request timeout: {:?}", config.crawler.request_timeout());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
