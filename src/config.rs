//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use crate::error::Result;

/// Default base URL of the Cantor Cristão collection site.
const DEFAULT_BASE_URL: &str = "https://sites.google.com/site/coletaneacantorcristao";

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Root directory for generated JSON/Markdown records
    pub output_dir: PathBuf,
    /// Base URL of the hymnal website to scrape
    pub base_url: String,
    /// Maximum number of concurrent page fetches
    pub fetch_concurrency: usize,
    /// Per-request timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Retry attempts for transient HTTP failures
    pub fetch_retries: u32,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            output_dir: PathBuf::from("./output"),
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_concurrency: 4,
            fetch_timeout_secs: 30,
            fetch_retries: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)] // Returns Result for forward-compatible API
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        // Output directory: env var override with ~ expansion
        if let Ok(dir) = env::var("HINARIO_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(shellexpand::tilde(&dir).to_string());
        }

        if let Ok(url) = env::var("HINARIO_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(n) = env::var("FETCH_CONCURRENCY") {
            if let Ok(n) = n.parse::<usize>() {
                config.fetch_concurrency = n.max(1);
            }
        }

        if let Ok(secs) = env::var("FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.fetch_timeout_secs = secs;
            }
        }

        if let Ok(n) = env::var("FETCH_RETRIES") {
            if let Ok(n) = n.parse::<u32>() {
                config.fetch_retries = n;
            }
        }

        Ok(config)
    }

    /// Directory for JSON records under the output root
    #[must_use]
    pub fn json_dir(&self) -> PathBuf {
        self.output_dir.join("json")
    }

    /// Directory for Markdown records under the output root
    #[must_use]
    pub fn markdown_dir(&self) -> PathBuf {
        self.output_dir.join("markdown")
    }
}
