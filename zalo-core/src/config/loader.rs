//! # Configuration Loader
//!
//! Loads and merges configuration from multiple sources:
//! 1. Default values (lowest priority)
//! 2. Configuration file (middle priority)
//! 3. Environment variables (highest priority)

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};

const DEFAULT_ENV_PREFIX: &str = "ZALO_BRIDGE";

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: PathBuf,

    /// Set when the path was given explicitly; a missing file is then an error
    required: bool,

    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config_path: Self::default_config_path(),
            required: false,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for an explicitly chosen file, which must exist.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            required: true,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        if let Ok(config_path) = env::var(format!("{}_CONFIG", DEFAULT_ENV_PREFIX)) {
            return PathBuf::from(config_path);
        }

        let possible_paths = [
            PathBuf::from("zalo-bridge.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|d| d.join("zalo-bridge").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/etc/zalo-bridge/config.toml")),
        ];

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        possible_paths[0].clone()
    }

    /// Load configuration with full hierarchy, then validate it.
    pub fn load(&self) -> BridgeResult<BridgeConfig> {
        let mut config = if self.config_path.exists() {
            debug!(path = %self.config_path.display(), "Loading config file");
            self.load_from_file()?
        } else if self.required {
            return Err(BridgeError::configuration(format!(
                "Config file '{}' does not exist",
                self.config_path.display()
            )));
        } else {
            BridgeConfig::default()
        };

        self.merge_env_config(&mut config)?;

        config.validate().map_err(|e| {
            BridgeError::configuration(format!("Configuration validation failed: {}", e))
        })?;

        Ok(config)
    }

    fn load_from_file(&self) -> BridgeResult<BridgeConfig> {
        let content = std::fs::read_to_string(&self.config_path).map_err(|e| {
            BridgeError::configuration(format!(
                "Failed to read config file '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            BridgeError::configuration(format!(
                "Failed to parse config file '{}': {}",
                self.config_path.display(),
                e
            ))
        })
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(format!("{}_{}", self.env_prefix, name)).ok()
    }

    fn merge_env_config(&self, config: &mut BridgeConfig) -> BridgeResult<()> {
        if let Some(val) = self.env_var("GATEWAY_URL") {
            config.gateway.url = val;
        }
        if let Some(val) = self.env_var("REQUEST_TIMEOUT") {
            config.gateway.request_timeout_secs = parse_u64(&val, "REQUEST_TIMEOUT")?;
        }
        if let Some(val) = self.env_var("CONNECT_TIMEOUT") {
            config.gateway.connect_timeout_secs = parse_u64(&val, "CONNECT_TIMEOUT")?;
        }
        if let Some(val) = self.env_var("MAX_RECONNECTS") {
            config.reconnect.max_attempts = parse_u32(&val, "MAX_RECONNECTS")?;
        }
        if let Some(val) = self.env_var("TEMP_DIR") {
            config.media.temp_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = self.env_var("LOG") {
            config.logging.level = val;
        }
        Ok(())
    }
}

fn parse_u32(s: &str, name: &str) -> BridgeResult<u32> {
    s.parse::<u32>().map_err(|e| {
        BridgeError::configuration(format!(
            "Invalid {} '{}': must be a valid number. Error: {}",
            name, s, e
        ))
    })
}

fn parse_u64(s: &str, name: &str) -> BridgeResult<u64> {
    s.parse::<u64>().map_err(|e| {
        BridgeError::configuration(format!(
            "Invalid {} '{}': must be a valid number. Error: {}",
            name, s, e
        ))
    })
}
