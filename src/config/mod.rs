//! Configuration management for the GiftMarket client
//!
//! This module handles loading and validating configuration from environment
//! variables. Every value has a default so the binary runs with no
//! environment at all.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the marketplace API server
    pub api_base_url: String,

    /// Directory holding durable local state (the external id file)
    pub data_dir: PathBuf,

    /// Default display name sent on identity resolution
    pub display_name: String,

    /// Notification poll interval in seconds
    pub poll_interval_secs: u64,

    /// Decorative rate-walk tick interval in seconds
    pub rate_walk_interval_secs: u64,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let api_base_url = env::var("MARKET_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".to_string());

        let data_dir = env::var("MARKET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".giftmarket"));

        let display_name = env::var("DISPLAY_NAME").unwrap_or_else(|_| "User".to_string());

        let poll_interval_secs = parse_secs("POLL_INTERVAL_SECS", 3)?;
        let rate_walk_interval_secs = parse_secs("RATE_WALK_INTERVAL_SECS", 30)?;

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            api_base_url,
            data_dir,
            display_name,
            poll_interval_secs,
            rate_walk_interval_secs,
            log_level,
        })
    }
}

fn parse_secs(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue(var, raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue(var, raw));
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}
