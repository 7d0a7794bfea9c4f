//! Error types for txform-core
//!
//! This module provides error handling for form collection and backend
//! dispatch, including error codes, severities, and suggestions.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form session unknown or expired
    SessionNotFound,
    /// A submitted field could not be used
    InvalidInput,
    /// Submitted row was never issued by the session
    UnknownRow,
    /// Session row missing from the submission
    MissingRow,
    /// Backend unreachable or connection dropped
    TransportError,
    /// Backend answered with something that is not a calculation response
    MalformedResponse,
    /// HTTP client could not be built
    ClientInit,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::SessionNotFound => write!(f, "SESSION_NOT_FOUND"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
            ErrorCode::UnknownRow => write!(f, "UNKNOWN_ROW"),
            ErrorCode::MissingRow => write!(f, "MISSING_ROW"),
            ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
            ErrorCode::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
            ErrorCode::ClientInit => write!(f, "CLIENT_INIT"),
        }
    }
}

/// Error body returned by the JSON endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    /// Human-readable message
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// What the user can do about it
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - the user can fix it and resubmit
    Warning,
    /// Error - the backend or network failed
    Error,
    /// Critical - the server cannot talk to the backend at all
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for txform-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Form session {id} has expired, reload the page to start again")]
    SessionNotFound { id: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Transaction {row} does not belong to this form")]
    UnknownRow { row: u32 },

    #[error("Transaction {row} is missing from the submission")]
    MissingRow { row: u32 },

    #[error("{message}")]
    Transport { message: String },

    #[error("Unexpected response from backend: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to initialize HTTP client: {message}")]
    ClientInit { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            CoreError::InvalidInput { .. } => ErrorCode::InvalidInput,
            CoreError::UnknownRow { .. } => ErrorCode::UnknownRow,
            CoreError::MissingRow { .. } => ErrorCode::MissingRow,
            CoreError::Transport { .. } => ErrorCode::TransportError,
            CoreError::MalformedResponse { .. } => ErrorCode::MalformedResponse,
            CoreError::ClientInit { .. } => ErrorCode::ClientInit,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::SessionNotFound { .. } => ErrorSeverity::Info,
            CoreError::InvalidInput { .. } => ErrorSeverity::Warning,
            CoreError::UnknownRow { .. } => ErrorSeverity::Warning,
            CoreError::MissingRow { .. } => ErrorSeverity::Warning,
            CoreError::Transport { .. } => ErrorSeverity::Error,
            CoreError::MalformedResponse { .. } => ErrorSeverity::Error,
            CoreError::ClientInit { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::SessionNotFound { .. } => {
                details = details.with_suggestion(
                    "Reload the page to start a new form.".to_string()
                );
            }
            CoreError::InvalidInput { field, .. } => {
                details = details.with_detail(serde_json::json!({ "field": field }));
                details = details.with_suggestion(
                    format!("Correct the '{}' field and submit again.", field)
                );
            }
            CoreError::UnknownRow { row } | CoreError::MissingRow { row } => {
                details = details.with_detail(serde_json::json!({ "row": row }));
                details = details.with_suggestion(
                    "Reload the page; the form and the server are out of step.".to_string()
                );
            }
            CoreError::Transport { .. } => {
                details = details.with_suggestion(
                    "Check that the calculation backend is running.".to_string()
                );
                details = details.with_suggestion(
                    "Check backend.base_url in the configuration.".to_string()
                );
            }
            CoreError::MalformedResponse { .. } => {
                details = details.with_suggestion(
                    "Check that backend.endpoint points at the calculation endpoint.".to_string()
                );
            }
            CoreError::ClientInit { .. } => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Form session the failure belongs to
    pub session_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            session_id: None,
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add the form session id
    pub fn with_session_id(mut self, session_id: String) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let line = format!(
            "[{}] {} - Operation: {} - Session: {:?} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.session_id,
            context.data
        );
        match error.severity() {
            ErrorSeverity::Info => log::info!(target: "txform::error", "{}", line),
            ErrorSeverity::Warning => log::warn!(target: "txform::error", "{}", line),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                log::error!(target: "txform::error", "{}", line)
            }
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "txform::error",
            "WARNING: {} - Operation: {} - Session: {:?}",
            message,
            context.operation,
            context.session_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::SessionNotFound.to_string(), "SESSION_NOT_FOUND");
        assert_eq!(ErrorCode::TransportError.to_string(), "TRANSPORT_ERROR");
        assert_eq!(ErrorCode::MalformedResponse.to_string(), "MALFORMED_RESPONSE");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::InvalidInput {
            field: "years".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(error.code(), ErrorCode::InvalidInput);
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::Transport { message: "connection refused".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Error);
        assert_eq!(error.to_string(), "connection refused");
    }

    #[test]
    fn test_error_details_invalid_input() {
        let error = CoreError::InvalidInput {
            field: "amount2".to_string(),
            message: "not a number".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::InvalidInput);
        assert_eq!(details.details, Some(serde_json::json!({ "field": "amount2" })));
        assert!(details.message.contains("amount2"));
    }

    #[test]
    fn test_error_details_serialize_as_json_body() {
        let details = CoreError::MissingRow { row: 2 }.to_details();
        let body = serde_json::to_value(&details).unwrap();

        assert_eq!(body["code"], "MISSING_ROW");
        assert_eq!(body["error"], "Transaction 2 is missing from the submission");
        assert_eq!(body["details"]["row"], 2);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_error_details_transport_suggestions() {
        let details = CoreError::Transport { message: "refused".to_string() }.to_details();
        assert_eq!(details.suggestions.len(), 2);
        assert_eq!(details.message, "refused");
        assert!(serde_json::to_value(&details).unwrap().get("details").is_none());
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("submit_form")
            .with_session_id("abc".to_string())
            .with_data("rows", serde_json::json!(3));

        assert_eq!(context.operation, "submit_form");
        assert_eq!(context.session_id.as_deref(), Some("abc"));
        assert_eq!(context.data["rows"], 3);
    }
}
