//! Configuration management for the analysis engine.
//!
//! Configuration is stored in TOML format in the platform config directory
//! and loaded once at startup. Every tunable has a sensible default, so a
//! missing config file is not an error.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [fetch]
//! timeout_secs = 30
//! cache_ttl_secs = 300
//!
//! [analysis]
//! max_sites = 10
//! batch_size = 5
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration for the analysis engine.
///
/// ## File Location
///
/// - Linux: `~/.config/crawlready/config.toml`
/// - macOS: `~/Library/Preferences/dev.crawlready/config.toml`
/// - Windows: `%APPDATA%\crawlready\config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outbound HTTP behavior.
    pub fetch: FetchConfig,
    /// Multi-site analysis limits.
    pub analysis: AnalysisConfig,
}

/// Settings for the fetch gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds. One fixed timeout bounds every outbound
    /// call; exceeding it is treated like any other network failure.
    pub timeout_secs: u64,

    /// How long successful GET responses stay cached, in seconds.
    pub cache_ttl_secs: u64,

    /// User agent sent on every request.
    pub user_agent: String,
}

/// Settings for multi-site orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Default cap on the number of sites analyzed per run.
    pub max_sites: usize,

    /// How many per-site analyses run concurrently within a batch.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            cache_ttl_secs: 300,
            user_agent: concat!("crawlready/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_sites: 10,
            batch_size: 5,
        }
    }
}

impl FetchConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache TTL as a [`Duration`].
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Config {
    /// Load configuration from the default location or create with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// contains invalid TOML. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply `CRAWLREADY_*` environment overrides on top of file values.
    ///
    /// The lookup is injected so tests can override without touching the
    /// process environment.
    #[must_use]
    pub fn with_env_overrides(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(secs) = get("CRAWLREADY_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.fetch.timeout_secs = secs;
        }
        if let Some(secs) = get("CRAWLREADY_CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.fetch.cache_ttl_secs = secs;
        }
        if let Some(agent) = get("CRAWLREADY_USER_AGENT") {
            self.fetch.user_agent = agent;
        }
        if let Some(max) = get("CRAWLREADY_MAX_SITES").and_then(|v| v.parse().ok()) {
            self.analysis.max_sites = max;
        }
        if let Some(size) = get("CRAWLREADY_BATCH_SIZE").and_then(|v| v.parse().ok()) {
            self.analysis.batch_size = size;
        }
        self
    }

    /// Save the configuration to the default location, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        let parent = config_path
            .parent()
            .ok_or_else(|| Error::Config("Invalid config path".into()))?;

        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "", "crawlready")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
