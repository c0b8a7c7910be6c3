//! Configuration for STORMWATCH.
//!
//! Settings live in `~/.stormwatch/config.yaml`. Every section is optional;
//! a missing file yields [`StormwatchConfig::default`].
//!
//! ```yaml
//! feed:
//!   url: https://api.weather.gov/alerts/active
//!   user_agent: "stormwatch (ops@example.com)"
//!   timeout_secs: 10
//! polling:
//!   fetch_interval_ms: 3000
//!   rotation_interval_ms: 10000
//! display:
//!   list_size: 10
//!   county_limit: 6
//!   order: recency
//!   flash_secs: 5
//! audio:
//!   enabled: true
//!   sound_dir: /usr/share/stormwatch/sounds
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stormwatch_core::{Result, StormError};
use tracing::{debug, info};

/// Default alerts endpoint.
pub const DEFAULT_FEED_URL: &str = "https://api.weather.gov/alerts/active";

/// Config file path (typically ~/.stormwatch/config.yaml).
pub fn config_path() -> Option<PathBuf> {
    stormwatch_core::logging::stormwatch_home()
        .ok()
        .map(|home| home.join("config.yaml"))
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StormwatchConfig {
    /// Alerts feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Timer periods
    #[serde(default)]
    pub polling: PollingConfig,

    /// Dashboard list and top bar settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Audio cue settings
    #[serde(default)]
    pub audio: AudioConfig,
}

/// Alerts feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Endpoint returning the active alerts document
    pub url: String,
    /// User-Agent header; the NWS API rejects anonymous clients
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            user_agent: format!("stormwatch/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
        }
    }
}

/// Timer periods for the two independent tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Fetch-and-reconcile period
    #[serde(alias = "fetchIntervalMs")]
    pub fetch_interval_ms: u64,
    /// Top bar rotation period
    #[serde(alias = "rotationIntervalMs")]
    pub rotation_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fetch_interval_ms: 3000,
            rotation_interval_ms: 10_000,
        }
    }
}

impl PollingConfig {
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }

    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation_interval_ms)
    }
}

/// Ordering of the scrolling alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOrder {
    /// Most recently sent first
    #[default]
    Recency,
    /// Priority rank first, recency as tie-breaker
    Priority,
}

/// Dashboard list and top bar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of alerts in the scrolling list
    pub list_size: usize,
    /// Counties listed before the "..." marker
    pub county_limit: usize,
    /// List ordering
    pub order: DisplayOrder,
    /// How long newly inserted rows stay highlighted
    pub flash_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            list_size: 10,
            county_limit: 6,
            order: DisplayOrder::Recency,
            flash_secs: 5,
        }
    }
}

/// Audio cue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Whether cues are played at all
    pub enabled: bool,
    /// Directory holding the sound files
    pub sound_dir: PathBuf,
    /// Sound for new warnings
    pub warning: String,
    /// Sound for new watches
    pub watch: String,
    /// Sound for new advisories
    pub advisory: String,
    /// Sound for an event-name change on a known alert
    pub upgrade: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let sound_dir = stormwatch_core::logging::stormwatch_home()
            .map(|home| home.join("sounds"))
            .unwrap_or_else(|_| PathBuf::from("sounds"));
        Self {
            enabled: true,
            sound_dir,
            warning: "warning.wav".to_string(),
            watch: "watch.wav".to_string(),
            advisory: "advisory.wav".to_string(),
            upgrade: "upgrade.wav".to_string(),
        }
    }
}

impl StormwatchConfig {
    /// Load from the default path, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StormError::config_not_found_with_source(path, e)
            } else {
                StormError::io("reading config", path, e)
            }
        })?;

        let config = Self::parse(&content).map_err(|message| StormError::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.polling.fetch_interval_ms == 0 {
            return Err(StormError::config_validation(
                "polling.fetch_interval_ms must be greater than 0",
            ));
        }
        if self.polling.rotation_interval_ms == 0 {
            return Err(StormError::config_validation(
                "polling.rotation_interval_ms must be greater than 0",
            ));
        }
        if self.display.list_size == 0 {
            return Err(StormError::config_validation(
                "display.list_size must be greater than 0",
            ));
        }
        if self.display.county_limit == 0 {
            return Err(StormError::config_validation(
                "display.county_limit must be greater than 0",
            ));
        }
        if !(self.feed.url.starts_with("http://") || self.feed.url.starts_with("https://")) {
            return Err(StormError::config_validation(format!(
                "feed.url must be an http(s) URL, got '{}'",
                self.feed.url
            )));
        }
        if self.feed.timeout_secs == 0 {
            return Err(StormError::config_validation(
                "feed.timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Override the fetch period.
    pub fn with_fetch_interval_ms(mut self, ms: u64) -> Self {
        self.polling.fetch_interval_ms = ms;
        self
    }

    /// Override the rotation period.
    pub fn with_rotation_interval_ms(mut self, ms: u64) -> Self {
        self.polling.rotation_interval_ms = ms;
        self
    }

    /// Override the feed URL.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed.url = url.into();
        self
    }

    /// Disable audio cues.
    pub fn muted(mut self) -> Self {
        self.audio.enabled = false;
        self
    }
}
