//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registry gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    #[serde(default = "default_registry_account")]
    pub registry_account: String,

    /// Account id balances are queried for; absent means balances are
    /// skipped entirely
    #[serde(default)]
    pub viewer_account: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "http://localhost:3030".to_string()
}

fn default_registry_account() -> String {
    "tokenlist.test".to_string()
}

fn default_request_timeout() -> u64 {
    5000 // 5 seconds
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            registry_account: default_registry_account(),
            viewer_account: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Sync cycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_page_limit")]
    pub page_limit: u64,

    #[serde(default = "default_enrich_concurrency")]
    pub enrich_concurrency: usize,
}

fn default_page_limit() -> u64 {
    100
}

fn default_enrich_concurrency() -> usize {
    8
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
            enrich_concurrency: default_enrich_concurrency(),
        }
    }
}

/// Notification lifecycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_clear_after")]
    pub clear_after_secs: u64,
}

fn default_clear_after() -> u64 {
    11
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            clear_after_secs: default_clear_after(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("tokenlist").join("config.toml")),
            Some(PathBuf::from("/etc/tokenlist/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Gateway overrides
        if let Ok(url) = std::env::var("TOKENLIST_GATEWAY_URL") {
            self.gateway.base_url = url;
        }
        if let Ok(account) = std::env::var("TOKENLIST_REGISTRY_ACCOUNT") {
            self.gateway.registry_account = account;
        }
        if let Ok(viewer) = std::env::var("TOKENLIST_VIEWER_ACCOUNT") {
            self.gateway.viewer_account = if viewer.is_empty() {
                None
            } else {
                Some(viewer)
            };
        }

        // Sync overrides
        if let Ok(limit) = std::env::var("TOKENLIST_PAGE_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.sync.page_limit = l;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("TOKENLIST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TOKENLIST_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Tokenlist Configuration
#
# Environment variables override these settings:
# - TOKENLIST_GATEWAY_URL
# - TOKENLIST_REGISTRY_ACCOUNT
# - TOKENLIST_VIEWER_ACCOUNT
# - TOKENLIST_PAGE_LIMIT
# - TOKENLIST_LOG_LEVEL
# - TOKENLIST_LOG_FORMAT

[gateway]
# Registry gateway URL
base_url = "http://localhost:3030"

# Account id of the registry contract
registry_account = "tokenlist.test"

# Account to query balances for (omit to skip balance lookups)
# viewer_account = "alice.test"

# Request timeout in milliseconds
request_timeout_ms = 5000

[sync]
# Page size for registry listing
page_limit = 100

# Maximum in-flight enrichment lookups
enrich_concurrency = 8

[notifications]
# How long a notification stays visible (seconds)
clear_after_secs = 11

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.gateway.base_url, "http://localhost:3030");
        assert!(config.gateway.viewer_account.is_none());
        assert_eq!(config.sync.page_limit, 100);
        assert_eq!(config.sync.enrich_concurrency, 8);
        assert_eq!(config.notifications.clear_after_secs, 11);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [gateway]
            viewer_account = "alice.test"

            [sync]
            page_limit = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.viewer_account.as_deref(), Some("alice.test"));
        assert_eq!(config.sync.page_limit, 25);
        // Untouched sections keep defaults
        assert_eq!(config.sync.enrich_concurrency, 8);
        assert_eq!(config.notifications.clear_after_secs, 11);
    }

    #[test]
    fn test_generated_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.gateway.registry_account, "tokenlist.test");
        assert_eq!(config.notifications.clear_after_secs, 11);
    }
}
