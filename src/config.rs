//! Configuration file parser for ~/.config/lurk/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields`
//! off), though we log a warning when the file contains potential typos.

use crate::api::{Category, HnClient};
use crate::loader::pager;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the item API. Overridable for mirrors and tests.
    pub api_base_url: String,

    /// Stories per listing page (clamped to 1..=100).
    pub page_size: usize,

    /// Category shown at startup when none is given on the command line.
    pub default_category: Category,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: HnClient::DEFAULT_BASE_URL.to_string(),
            page_size: pager::DEFAULT_PAGE_SIZE,
            default_category: Category::Top,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Out-of-range `page_size` → clamped, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted or
        // runaway file into memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race: file deleted between metadata and read.
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse config from a TOML string.
    fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // Parse as a raw table first to flag likely typos.
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["api_base_url", "page_size", "default_category"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown config key (typo?), ignoring");
                }
            }
        }

        let mut config: Config = toml::from_str(content)?;

        if config.page_size == 0 || config.page_size > 100 {
            tracing::warn!(
                page_size = config.page_size,
                default = pager::DEFAULT_PAGE_SIZE,
                "page_size out of range (1..=100), using default"
            );
            config.page_size = pager::DEFAULT_PAGE_SIZE;
        }

        Ok(config)
    }
}
