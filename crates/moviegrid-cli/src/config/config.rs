//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB connection settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search behavior.
    #[serde(default)]
    pub search: SearchConfig,
    /// Terminal UI behavior.
    #[serde(default)]
    pub ui: UiConfig,
}

/// TMDB connection settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// v3 API key. `TMDB_API_KEY` / `TMDB_API_TOKEN` take precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language (e.g. "en-US", "pt-BR").
    pub language: String,
    /// API base URL override (e.g. a caching proxy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: String::from(DEFAULT_LANGUAGE),
            base_url: None,
        }
    }
}

/// Search behavior.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet time after the last keystroke before a live search fires.
    pub debounce_ms: u64,
    /// Minimum trimmed input length for a live search.
    pub min_query_len: usize,
    /// Movies kept from the first result page (0 = all).
    pub display_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            min_query_len: 3,
            display_limit: moviegrid_api::catalog::DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Debounce delay as a `Duration`.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Terminal UI behavior.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// How long error notices stay visible.
    pub error_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_timeout_ms: 3000,
        }
    }
}

impl UiConfig {
    /// Error notice lifetime as a `Duration`.
    #[must_use]
    pub const fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms)
    }
}

/// Credentials used to reach TMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// v3 API key.
    ApiKey(String),
    /// v4 read access token.
    Token(String),
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Picks credentials: environment token, then environment key, then
    /// the key from the config file. Blank values are ignored.
    #[must_use]
    pub fn credentials(
        &self,
        env_token: Option<String>,
        env_key: Option<String>,
    ) -> Option<Credentials> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        non_blank(env_token)
            .map(Credentials::Token)
            .or_else(|| non_blank(env_key).map(Credentials::ApiKey))
            .or_else(|| non_blank(self.tmdb.api_key.clone()).map(Credentials::ApiKey))
    }
}
