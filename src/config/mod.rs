//! Configuration module
//!
//! This module handles loading, parsing, and validating the TOML
//! configuration, and building listing URLs from it. Every section and key
//! has a default, so an empty file (or no file at all) describes a crawl of
//! the current software-category listing.
//!
//! # Example
//!
//! ```no_run
//! use softcon_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Listing: {}", config.crawl.listing_url(&config.site).unwrap());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Category, Config, CrawlConfig, ListingMode, OutputConfig, SiteProfile, UserAgentConfig,
    SUGGESTED_TERM,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_WORKERS};
