//! # Bridge configuration
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Environment Variables           │
//! │    ZALO_BRIDGE_GATEWAY_URL=...          │
//! ├─────────────────────────────────────────┤
//! │         Config File (TOML)              │
//! │    [gateway]                            │
//! │    url = "http://localhost:3500"        │
//! ├─────────────────────────────────────────┤
//! │         Default Values                  │
//! └─────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BridgeError, BridgeResult};

mod loader;

pub use loader::ConfigLoader;

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3500";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1_000;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_initial_backoff_ms() -> u64 {
    DEFAULT_INITIAL_BACKOFF_MS
}

fn default_max_backoff_ms() -> u64 {
    DEFAULT_MAX_BACKOFF_MS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_RECONNECT_ATTEMPTS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub gateway: GatewayConfig,
    pub reconnect: ReconnectConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}

/// Where and how to reach the gateway process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Bound on every HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Bound on the WebSocket dial
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory for outbound media temp files; the system temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl MediaConfig {
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> BridgeResult<()> {
        let url = self.gateway.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BridgeError::configuration(format!(
                "gateway.url must start with http:// or https://, got '{}'",
                self.gateway.url
            )));
        }
        if self.gateway.request_timeout_secs == 0 {
            return Err(BridgeError::configuration(
                "gateway.request_timeout_secs must be greater than 0",
            ));
        }
        if self.gateway.connect_timeout_secs == 0 {
            return Err(BridgeError::configuration(
                "gateway.connect_timeout_secs must be greater than 0",
            ));
        }
        if self.reconnect.max_attempts == 0 {
            return Err(BridgeError::configuration(
                "reconnect.max_attempts must be greater than 0",
            ));
        }
        if self.reconnect.initial_backoff_ms == 0 {
            return Err(BridgeError::configuration(
                "reconnect.initial_backoff_ms must be greater than 0",
            ));
        }
        if self.reconnect.max_backoff_ms < self.reconnect.initial_backoff_ms {
            return Err(BridgeError::configuration(format!(
                "reconnect.max_backoff_ms ({}) must not be below initial_backoff_ms ({})",
                self.reconnect.max_backoff_ms, self.reconnect.initial_backoff_ms
            )));
        }
        Ok(())
    }

    /// Annotated example configuration file.
    pub fn example() -> &'static str {
        r#"# Zalo bridge configuration

[gateway]
# Base URL of the gateway process; the event stream lives at <url>/ws
url = "http://localhost:3500"
# Timeout for every HTTP request to the gateway (seconds)
request_timeout_secs = 30
# Timeout for opening the WebSocket (seconds)
connect_timeout_secs = 10

[reconnect]
# Backoff doubles from initial_backoff_ms up to max_backoff_ms
initial_backoff_ms = 1000
max_backoff_ms = 30000
# The session is given up after this many failed redials
max_attempts = 10

[media]
# Where outbound images are staged before upload (defaults to the system temp dir)
# temp_dir = "/var/tmp/zalo-bridge"

[logging]
# Used when RUST_LOG is not set
level = "info"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.gateway.url, "http://localhost:3500");
        assert_eq!(config.gateway.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.reconnect.max_attempts, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_parses_to_defaults() {
        let parsed: BridgeConfig = toml::from_str(BridgeConfig::example()).unwrap();
        assert_eq!(parsed, BridgeConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = BridgeConfig::default();
        config.gateway.url = "ftp://gateway".into();
        assert!(matches!(config.validate(), Err(BridgeError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = BridgeConfig::default();
        config.gateway.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.reconnect.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_backoff_order() {
        let mut config = BridgeConfig::default();
        config.reconnect.initial_backoff_ms = 5_000;
        config.reconnect.max_backoff_ms = 1_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_media_temp_dir_fallback() {
        let media = MediaConfig::default();
        assert_eq!(media.temp_dir(), std::env::temp_dir());
    }
}
