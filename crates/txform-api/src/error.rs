//! Error types for txform-api
//!
//! Form routes are driven by HTMX, so errors do not render an error page.
//! They come back as an empty response that tells HTMX to leave the page
//! alone and raise a `showAlert` event carrying the message.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use txform_core::error::{DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger};
use txform_core::{CoreError, ALERT_PREFIX};

/// Client-side event the page listens for
pub const ALERT_EVENT: &str = "showAlert";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

impl ApiError {
    /// Code, message and suggestions for a JSON error body
    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::Core(e) => e.to_details(),
            ApiError::BadRequest { message } => ErrorDetails::new(ErrorCode::InvalidInput, message.clone())
                .with_suggestion("Send the form as application/x-www-form-urlencoded.".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Core(e) => DefaultErrorLogger.log_error(e, &ErrorContext::new("request")),
            ApiError::BadRequest { message } => {
                DefaultErrorLogger.log_warning(message, &ErrorContext::new("request"))
            }
        }
        alert_response(&format!("{}{}", ALERT_PREFIX, self))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Empty 200 that skips the swap and raises a blocking alert in the browser
pub fn alert_response(message: &str) -> Response {
    let trigger = ascii_json(&serde_json::json!({ ALERT_EVENT: message }).to_string());

    let mut headers = HeaderMap::new();
    headers.insert("HX-Reswap", HeaderValue::from_static("none"));
    let value = HeaderValue::from_str(&trigger)
        .unwrap_or_else(|_| HeaderValue::from_static(r#"{"showAlert":"Error"}"#));
    headers.insert("HX-Trigger", value);

    (StatusCode::OK, headers, String::new()).into_response()
}

/// Escape DEL and non-ASCII characters as `\uXXXX` so JSON survives as a header value
fn ascii_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
