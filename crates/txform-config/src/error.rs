//! Error types for txform-config

use std::fmt::Write as _;
use thiserror::Error;

/// Reasons the configuration could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML format: {message}")]
    InvalidYaml { message: String },

    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Stable code printed ahead of the message
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ConfigError::Read { .. } => "READ_FAILED",
            ConfigError::InvalidYaml { .. } => "INVALID_YAML",
            ConfigError::InvalidValue { .. } => "INVALID_VALUE",
        }
    }

    /// What the operator can do about it
    pub fn hints(&self) -> Vec<String> {
        match self {
            ConfigError::FileNotFound { .. } => vec![
                "Use --config to point at an existing config file.".to_string(),
                "Run with --print-default-config to generate one.".to_string(),
            ],
            ConfigError::Read { .. } => {
                vec!["Check that the file is readable by this user.".to_string()]
            }
            ConfigError::InvalidYaml { .. } => {
                vec!["Compare your file with the output of --print-default-config.".to_string()]
            }
            ConfigError::InvalidValue { field, .. } => {
                vec![format!("Fix '{}' or remove it to use the default.", field)]
            }
        }
    }

    /// Multi-line report for the terminal when start-up fails
    pub fn report(&self) -> String {
        let mut out = format!("[{}] {}", self.code(), self);
        for hint in self.hints() {
            let _ = write!(out, "\n  - {}", hint);
        }
        out
    }
}

/// Result type with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
