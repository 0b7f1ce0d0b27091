//! Configuration module for Ebook-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a crawl can run with nothing but a destination
//! directory given on the command line.
//!
//! # Example
//!
//! ```no_run
//! use ebook_mirror::config::{load_config, validate};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! validate(&config).unwrap();
//! println!("Crawling from: {}", config.overview_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, load_config_with_fingerprint, parse_config};
pub use validation::validate;
