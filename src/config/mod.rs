//! Configuration module for Outlink-Audit
//!
//! This module holds the crawl configuration and loads it from TOML files.
//!
//! # Example
//!
//! ```no_run
//! use outlink_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("audit.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.max_pages);
//! ```

mod parser;
mod types;
pub mod validation;

// Re-export types
pub use types::{
    default_authority_domains, CrawlConfig, FilterMode, RecordingFilter, ScopeMode,
    DEFAULT_AUTHORITY_DOMAINS, DEFAULT_DELAY, DEFAULT_MAX_PAGES,
};

// Re-export parser functions
pub use parser::{load_config, load_list, parse_config, parse_list};
pub use validation::validate;
