//! Configuration module for Bot-Warden
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; [`Config::default`] is the documented default
//! configuration, so an empty file (or no file at all) yields a working setup.
//!
//! # Example
//!
//! ```no_run
//! use bot_warden::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("warden.toml")).unwrap();
//! println!("Refresh cadence: {}", config.cache_update_interval);
//! ```

mod duration;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LogLevel};

// Re-export parser functions
pub use duration::parse_duration;
pub use parser::load_config;
pub use validation::validate;
