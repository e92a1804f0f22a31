//! Configuration management for the container app CLI
//!
//! Settings come from several sources, later ones winning:
//! 1. Built-in defaults
//! 2. Config file (`--config`, `CONTAINERAPP_CONFIG`, `./containerapp.toml`,
//!    or the user config directory)
//! 3. Environment variables
//! 4. CLI arguments (applied by the command handlers)
//!
//! `configure --defaults` writes the `[defaults]` table back to the file.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{ClientConfig, PollPolicy};
use crate::constants::{
    api, config as config_constants, env as env_constants, http, limits, polling,
};
use crate::errors::{ConfigError, ConfigResult};

/// Log levels accepted in `[logging] level`
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Values used when a command does not supply them
    pub defaults: DefaultsConfig,
    /// Management API client settings
    pub client: ClientConfigToml,
    /// Provisioning wait settings
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Persisted command defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Management API endpoint
    pub endpoint: String,
    /// Bearer token, used when `CONTAINERAPP_ACCESS_TOKEN` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout (unset = no timeout)
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            endpoint: api::DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            tcp_nodelay: true,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// Provisioning wait settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between state checks
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Give up after this long
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: polling::DEFAULT_POLL_INTERVAL,
            timeout: polling::DEFAULT_TIMEOUT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when no verbosity flag is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl AppConfig {
    /// Load configuration with multi-source precedence
    ///
    /// An explicitly named config file (flag or `CONTAINERAPP_CONFIG`) must
    /// exist; the standard locations are optional.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_inner(config_file_override, true).await
    }

    /// Like [`AppConfig::load`], but a missing explicit file yields defaults
    ///
    /// Used by `configure`, which creates the file.
    pub async fn load_or_default(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_inner(config_file_override, false).await
    }

    async fn load_inner(
        config_file_override: Option<PathBuf>,
        require_explicit: bool,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        let explicit = Self::explicit_config_path(config_file_override);
        let config_path = match explicit {
            Some(ref path) => Some(path.clone()),
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if explicit.is_some() && require_explicit {
                return Err(ConfigError::NotFound { path });
            }
        }

        config.apply_overrides_from(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Path named by the flag or `CONTAINERAPP_CONFIG`
    pub fn explicit_config_path(config_file_override: Option<PathBuf>) -> Option<PathBuf> {
        config_file_override.or_else(|| {
            env::var_os(env_constants::CONFIG)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }

    /// File `configure` writes to
    pub fn write_path(config_file_override: Option<PathBuf>) -> ConfigResult<PathBuf> {
        match Self::explicit_config_path(config_file_override) {
            Some(path) => Ok(path),
            None => Self::default_config_path(),
        }
    }

    /// Apply environment overrides, reading variables through `lookup`
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(subscription) = get(env_constants::SUBSCRIPTION) {
            debug!("Subscription taken from {}", env_constants::SUBSCRIPTION);
            self.defaults.subscription = Some(subscription);
        }
        if let Some(location) = get(env_constants::LOCATION) {
            debug!("Default location taken from {}", env_constants::LOCATION);
            self.defaults.location = Some(location);
        }
        if let Some(endpoint) = get(env_constants::ENDPOINT) {
            debug!("Endpoint taken from {}", env_constants::ENDPOINT);
            self.client.endpoint = endpoint;
        }
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> ConfigResult<()> {
        self.endpoint_url()?;

        if self.client.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be non-zero".to_string(),
            });
        }
        if self.polling.interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval".to_string(),
                value: "0s".to_string(),
                reason: "Poll interval must be non-zero".to_string(),
            });
        }
        if let Some(ref level) = self.logging.level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Expected one of: {}", LOG_LEVELS.join(", ")),
                });
            }
        }
        Ok(())
    }

    fn endpoint_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.client.endpoint).map_err(|e| ConfigError::InvalidValue {
            field: "client.endpoint".to_string(),
            value: self.client.endpoint.clone(),
            reason: e.to_string(),
        })
    }

    /// Convert to the runtime client configuration
    pub fn to_client_config(&self) -> ConfigResult<ClientConfig> {
        Ok(ClientConfig {
            endpoint: self.endpoint_url()?,
            tcp_nodelay: self.client.tcp_nodelay,
            pool_idle_timeout: self.client.pool_idle_timeout,
            pool_max_per_host: self.client.pool_max_per_host,
            request_timeout: self.client.request_timeout,
            connect_timeout: self.client.connect_timeout,
            rate_limit_rps: self.client.rate_limit_rps,
        })
    }

    pub fn to_poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.polling.interval,
            timeout: self.polling.timeout,
        }
    }

    /// Set one `[defaults]` entry; an empty value clears it
    pub fn set_default(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let slot = match key.trim() {
            "location" => &mut self.defaults.location,
            "group" => &mut self.defaults.group,
            "subscription" => &mut self.defaults.subscription,
            other => {
                return Err(ConfigError::UnknownDefault {
                    key: other.to_string(),
                })
            }
        };

        let value = value.trim();
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        Ok(())
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(".").join(config_constants::LOCAL_FILE_NAME)];
        if let Ok(user_path) = Self::default_config_path() {
            search_paths.push(user_path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match found {
            Some(ref path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(config_constants::APP_DIR_NAME)
            .join(config_constants::FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write configuration as TOML, creating parent directories
    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        info!("Saved configuration to: {}", path.display());
        Ok(())
    }
}
