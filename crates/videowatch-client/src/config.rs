//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/videowatch/config.toml` by default. CLI flags take precedence
//! over file values, file values over built-in defaults.
//!
//! Unknown keys are rejected so a typo fails loudly instead of silently
//! falling back to a default.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use videowatch_core::{RenderFormat, RenderOptions};
use videowatch_protocol::Endpoint;

use crate::connection::StatusClient;
use crate::watch::{ReconnectPolicy, WatchOptions};

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the videowatch client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Connection settings.
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Watch loop settings.
    #[serde(default)]
    pub watch: WatchSettings,

    /// Display settings.
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Connection settings for the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionSettings {
    /// Server host name or address.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: Endpoint::DEFAULT_PORT,
            connect_timeout_secs: StatusClient::DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

/// Watch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSettings {
    /// Delay between a rendered snapshot and the next request, in milliseconds.
    pub poll_interval_ms: u64,

    /// Delay before the first reconnect attempt, in milliseconds.
    pub reconnect_initial_delay_ms: u64,

    /// Upper bound for the reconnect delay, in milliseconds.
    pub reconnect_max_delay_ms: u64,

    /// Reconnect backoff multiplier.
    pub reconnect_multiplier: f64,

    /// Jitter fraction applied to reconnect delays (0.0-1.0).
    pub reconnect_jitter_fraction: f64,

    /// Consecutive connection failures before giving up (0 = retry forever).
    pub max_consecutive_failures: u32,
}

impl Default for WatchSettings {
    fn default() -> Self {
        let options = WatchOptions::default();
        let policy = options.reconnect;
        Self {
            poll_interval_ms: options.poll_interval.as_millis() as u64,
            reconnect_initial_delay_ms: policy.initial_delay.as_millis() as u64,
            reconnect_max_delay_ms: policy.max_delay.as_millis() as u64,
            reconnect_multiplier: policy.multiplier,
            reconnect_jitter_fraction: policy.jitter_fraction,
            max_consecutive_failures: policy.max_consecutive_failures,
        }
    }
}

impl WatchSettings {
    /// Converts to a reconnect policy.
    pub fn to_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::default()
            .with_backoff(
                Duration::from_millis(self.reconnect_initial_delay_ms),
                Duration::from_millis(self.reconnect_max_delay_ms),
                self.reconnect_multiplier,
            )
            .with_jitter(self.reconnect_jitter_fraction)
            .with_max_failures(self.max_consecutive_failures)
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Output format for snapshots.
    pub format: RenderFormat,

    /// Prepend an update timestamp line to each snapshot.
    pub timestamps: bool,

    /// Clear the screen before each update (dashboard mode).
    pub clear_screen: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            format: RenderFormat::default(),
            timestamps: options.timestamps,
            clear_screen: options.clear_screen,
        }
    }
}

impl DisplaySettings {
    /// Converts to render options.
    pub fn to_render_options(&self) -> RenderOptions {
        RenderOptions {
            clear_screen: self.clear_screen,
            timestamps: self.timestamps,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("videowatch")
    }
}
