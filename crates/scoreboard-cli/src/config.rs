//! Configuration for the scoreboard CLI

use anyhow::{Context, Result};
use scoreboard::CategoryFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;

// =============================================================================
// File-based Configuration (scoreboard.toml)
// =============================================================================

/// Configuration loaded from scoreboard.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// Where opportunity records come from
#[derive(Debug, Default, Deserialize)]
pub struct SourceConfig {
    /// JSON file with the opportunity payload
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// HTTP endpoint returning the opportunity payload
    #[serde(default)]
    pub url: Option<String>,
    /// HTTP timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Initial view settings
#[derive(Debug, Default, Deserialize)]
pub struct ViewConfig {
    /// Category selected on startup (All, Hot, Warm or Cold)
    #[serde(default)]
    pub category: Option<CategoryFilter>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| {
            "Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Unknown category (expected All, Hot, Warm or Cold)\n\
             - Incorrect data types (strings vs numbers)\n\n\
             See scoreboard.toml.example for the expected format."
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Resolved data source
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

/// Main configuration struct with command-line overrides applied
#[derive(Debug)]
pub struct Config {
    pub source: Source,
    pub timeout: Duration,
    pub default_category: Option<CategoryFilter>,
}

impl Config {
    /// Create config from file config and optional source overrides
    pub fn from_file(file_config: &FileConfig, file: Option<PathBuf>, url: Option<String>) -> Result<Self> {
        // Command-line flags win over the config file; a file beats a URL
        let source = match (file, url) {
            (Some(path), _) => Source::File(path),
            (None, Some(url)) => Source::Url(url),
            (None, None) => match (&file_config.source.file, &file_config.source.url) {
                (Some(path), _) => Source::File(path.clone()),
                (None, Some(url)) => Source::Url(url.clone()),
                (None, None) => anyhow::bail!(
                    "No opportunity source configured.\n\n\
                     Pass --file <payload.json> or --url <endpoint>, or set\n\
                     [source] file/url in {}.",
                    constants::CONFIG_FILE
                ),
            },
        };

        Ok(Self {
            source,
            timeout: Duration::from_secs(
                file_config
                    .source
                    .timeout_secs
                    .unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            default_category: file_config.view.category,
        })
    }
}
