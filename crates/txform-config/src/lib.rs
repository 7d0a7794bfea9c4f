//! Configuration management for txform
//!
//! This module handles loading, validation, and management of
//! txform configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Calculation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, without trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the calculation endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
        }
    }
}

impl BackendConfig {
    /// Full URL the transaction payload is posted to
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_endpoint() -> String {
    "/process-transactions".to_string()
}

/// Form behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Idle minutes before a form session is dropped
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u32,
    /// Currency shown in the amount/VAT labels
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: default_session_ttl(),
            currency_label: default_currency_label(),
        }
    }
}

fn default_session_ttl() -> u32 {
    60
}

fn default_currency_label() -> String {
    "AED".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
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

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Calculation backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Form settings
    #[serde(default)]
    pub form: FormConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_yaml(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let base_url = &self.backend.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: format!("Expected an http:// or https:// URL, got '{}'", base_url),
            });
        }

        if !self.backend.endpoint.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "backend.endpoint".to_string(),
                reason: "Endpoint path must start with '/'".to_string(),
            });
        }

        if self.form.session_ttl_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "form.session_ttl_minutes".to_string(),
                reason: "Session TTL must be at least one minute".to_string(),
            });
        }

        if self.form.currency_label.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "form.currency_label".to_string(),
                reason: "Currency label must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
