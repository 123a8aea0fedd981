//! Bot-Warden: a User-Agent warden for scraper and LLM-crawler traffic
//!
//! This crate implements the core of an HTTP middleware that classifies incoming
//! User-Agent strings against a dynamically refreshed index of known bot
//! identifiers, and renders a robots.txt reflecting the same index. Host
//! frameworks embed the [`manager::BotManager`] and act on the
//! [`action::Remediation`] it yields; the bundled CLI is a thin shell over the
//! same API.

pub mod action;
pub mod cache;
pub mod config;
pub mod index;
pub mod manager;
pub mod matcher;
pub mod parser;
pub mod source;
pub mod template;

use thiserror::Error;

/// Main error type for Bot-Warden operations
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Error retrieving source data from '{url}'. Status: {status}")]
    SourceStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse source '{url}': {message}")]
    Parse { url: String, message: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

    #[error("Invalid duration in config: {0}")]
    InvalidDuration(String),
}

/// Result type alias for Bot-Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use action::{BotAction, Remediation};
pub use config::{load_config, Config, LogLevel};
pub use index::{BotEntry, BotIndex, BotMetadata};
pub use manager::{BotManager, BotMatch};
