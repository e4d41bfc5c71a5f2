//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [search]
//! provider = "tavily"
//! endpoint = "https://api.tavily.com/search"
//! timeout_secs = 30
//! max_results = 10
//! search_depth = "basic"
//!
//! [logging]
//! directory = "/var/log/lookout"
//! json_file = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use lookout_search::{DEFAULT_MAX_RESULTS, SearchDepth};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default provider request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so partial configs (e.g. project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookoutConfig {
    /// Search provider settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSection>,

    /// Log output settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl LookoutConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Fields are merged individually, so a project file that only sets
    /// `max_results` keeps the user's endpoint and key.
    pub fn merge(&mut self, other: LookoutConfig) {
        if let Some(layer) = other.search {
            match self.search.as_mut() {
                Some(base) => base.merge(layer),
                None => self.search = Some(layer),
            }
        }

        if let Some(layer) = other.logging {
            match self.logging.as_mut() {
                Some(base) => base.merge(layer),
                None => self.logging = Some(layer),
            }
        }
    }

    /// Search settings, or defaults when the section is absent.
    pub fn search(&self) -> SearchSection {
        self.search.clone().unwrap_or_default()
    }

    /// Logging settings, or defaults when the section is absent.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref search) = self.search {
            search.validate()?;
        }
        Ok(())
    }

    /// Copy of this config with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(ref mut search) = copy.search
            && search.api_key.is_some()
        {
            search.api_key = Some("********".to_string());
        }
        copy
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Supported search providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    #[default]
    Tavily,
}

impl SearchBackend {
    /// Environment variable name for this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            SearchBackend::Tavily => "TAVILY_API_KEY",
        }
    }

    /// Short provider name.
    pub fn name(&self) -> &'static str {
        match self {
            SearchBackend::Tavily => "tavily",
        }
    }
}

impl std::fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Provider to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<SearchBackend>,
    /// Endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Plaintext API key. Prefer the environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Default result count for CLI searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Default search depth (`basic` or `advanced`, any case).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_depth: Option<String>,
}

impl SearchSection {
    /// Overlay `other` on this section; set fields win.
    pub fn merge(&mut self, other: SearchSection) {
        if other.provider.is_some() {
            self.provider = other.provider;
        }
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.max_results.is_some() {
            self.max_results = other.max_results;
        }
        if other.search_depth.is_some() {
            self.search_depth = other.search_depth;
        }
    }

    /// Configured provider, defaulting to Tavily.
    pub fn backend(&self) -> SearchBackend {
        self.provider.unwrap_or_default()
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Default result count.
    pub fn max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    /// Default search depth. Unparseable values are reported by
    /// [`validate`](Self::validate).
    pub fn search_depth(&self) -> SearchDepth {
        self.search_depth
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or_default()
    }

    /// Whether the section carries a non-empty plaintext key.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Check for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::invalid_value(
                "search.timeout_secs",
                "must be at least 1",
            ));
        }
        if self.max_results == Some(0) {
            return Err(ConfigError::invalid_value(
                "search.max_results",
                "must be at least 1",
            ));
        }
        if let Some(ref depth) = self.search_depth
            && let Err(message) = depth.parse::<SearchDepth>()
        {
            return Err(ConfigError::invalid_value("search.search_depth", message));
        }
        if let Some(ref endpoint) = self.endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::invalid_value(
                "search.endpoint",
                format!("'{}' is not an http(s) URL", endpoint),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for rotated JSON log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Whether to write the JSON log file at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_file: Option<bool>,
}

impl LoggingConfig {
    /// Overlay `other` on this section; set fields win.
    pub fn merge(&mut self, other: LoggingConfig) {
        if other.directory.is_some() {
            self.directory = other.directory;
        }
        if other.json_file.is_some() {
            self.json_file = other.json_file;
        }
    }

    /// Whether the JSON file layer is enabled (default on).
    pub fn json_file_enabled(&self) -> bool {
        self.json_file.unwrap_or(true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
