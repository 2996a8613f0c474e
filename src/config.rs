//! Configuration management and validation.
//!
//! Provides the settings the fallback orchestrator runs with (upstream
//! endpoints, timeouts, retries, source priority) and layered loading from
//! defaults, a TOML file and `NDBC_*` environment variables.

use crate::app::models::SourceFormat;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LATEST_OBS_BASE_URL, DEFAULT_REALTIME2_BASE_URL,
    DEFAULT_RETRIES, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_SOURCE_ORDER, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, ENV_PREFIX, MAX_TIMEOUT_SECS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main configuration for fetching and normalizing station feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for `.ocean`, `.spec` and `.txt` feeds
    pub realtime2_base_url: String,

    /// Base URL for `.rss` feeds
    pub latest_obs_base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries per source after a transport failure
    pub retries: u32,

    /// Delay before the first retry in milliseconds, doubled per attempt
    pub retry_backoff_ms: u64,

    /// User agent sent upstream
    pub user_agent: String,

    /// Sources in priority order
    pub sources: Vec<SourceFormat>,

    /// Echo raw upstream bodies alongside exhaustion errors
    pub debug: bool,

    /// Fetch every source and compose SST and wave height from the best ones
    pub prefer_both: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            realtime2_base_url: DEFAULT_REALTIME2_BASE_URL.to_string(),
            latest_obs_base_url: DEFAULT_LATEST_OBS_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sources: DEFAULT_SOURCE_ORDER
                .iter()
                .filter_map(|tag| tag.parse().ok())
                .collect(),
            debug: false,
            prefer_both: false,
        }
    }
}

impl Config {
    /// Create new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(Error::configuration(format!(
                "Timeout must be between 1 and {} seconds, got {}",
                MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        if self.sources.is_empty() {
            return Err(Error::configuration("At least one source must be configured"));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.sources.iter().find(|s| !seen.insert(**s)) {
            return Err(Error::configuration(format!(
                "Source '{}' is listed more than once",
                duplicate
            )));
        }

        for (name, url) in [
            ("realtime2_base_url", &self.realtime2_base_url),
            ("latest_obs_base_url", &self.latest_obs_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::configuration(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::configuration("User agent cannot be empty"));
        }

        Ok(())
    }

    /// Set the per-request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set retries per source
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the initial retry delay
    pub fn with_retry_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.retry_backoff_ms = backoff_ms;
        self
    }

    /// Set the source priority order
    pub fn with_sources(mut self, sources: Vec<SourceFormat>) -> Self {
        self.sources = sources;
        self
    }

    /// Point both feed families at other hosts
    pub fn with_base_urls(
        mut self,
        realtime2_base_url: impl Into<String>,
        latest_obs_base_url: impl Into<String>,
    ) -> Self {
        self.realtime2_base_url = realtime2_base_url.into();
        self.latest_obs_base_url = latest_obs_base_url.into();
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable raw body echo on failure
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Enable SST/wave composition across sources
    pub fn with_prefer_both(mut self) -> Self {
        self.prefer_both = true;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Upstream URL of one station feed
    pub fn source_url(&self, station: &str, format: SourceFormat) -> String {
        let base = match format {
            SourceFormat::Rss => &self.latest_obs_base_url,
            _ => &self.realtime2_base_url,
        };
        format!(
            "{}/{}.{}",
            base.trim_end_matches('/'),
            station,
            format.extension()
        )
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        Self::from_toml_str(&text)
    }

    /// Default config file location under the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load defaults, then a config file, then environment overrides
    ///
    /// An explicit path must exist; the default path is used only when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    debug!("Loading configuration from {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply `NDBC_*` overrides read through `lookup`
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(url) = var("REALTIME2_BASE_URL") {
            self.realtime2_base_url = url;
        }
        if let Some(url) = var("LATEST_OBS_BASE_URL") {
            self.latest_obs_base_url = url;
        }
        if let Some(value) = var("TIMEOUT_SECS") {
            self.timeout_secs = parse_env_number("TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = var("RETRIES") {
            self.retries = parse_env_number("RETRIES", &value)?;
        }
        if let Some(value) = var("RETRY_BACKOFF_MS") {
            self.retry_backoff_ms = parse_env_number("RETRY_BACKOFF_MS", &value)?;
        }
        if let Some(agent) = var("USER_AGENT") {
            self.user_agent = agent;
        }
        if let Some(list) = var("SOURCES") {
            self.sources = parse_sources(&list)?;
        }
        if let Some(value) = var("DEBUG") {
            self.debug = parse_env_flag("DEBUG", &value)?;
        }
        if let Some(value) = var("PREFER_BOTH") {
            self.prefer_both = parse_env_flag("PREFER_BOTH", &value)?;
        }

        Ok(self)
    }
}

/// Parse a comma-separated source list such as `ocean,spec,rss`
pub fn parse_sources(list: &str) -> Result<Vec<SourceFormat>> {
    list.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::parse::<SourceFormat>)
        .collect()
}

fn parse_env_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::configuration(format!(
            "{}{} must be a non-negative integer, got '{}'",
            ENV_PREFIX, name, value
        ))
    })
}

fn parse_env_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{}{} must be a boolean, got '{}'",
            ENV_PREFIX, name, value
        ))),
    }
}
