//! Error types for the Locintel SDK.

use locintel_core::ValidationError;
use serde_json::Value;

/// Result type for SDK operations.
pub type LocintelResult<T> = Result<T, LocintelError>;

/// Error types that can occur when calling the vendor APIs.
#[derive(Debug, thiserror::Error)]
pub enum LocintelError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("API Error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request timed out after all retries.
    #[error("Request timed out")]
    Timeout,

    /// Input rejected before sending.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LocintelError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Structured error body, if the gateway sent one.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Create an API error from a status code and response body.
    ///
    /// Understands the gateway's `{"errors": [{"errorCode", "errorDescription"}]}` shape as
    /// well as plain `{"error": ..}` and `{"message": ..}` bodies.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    default_reason(status).to_string()
                } else {
                    trimmed.to_string()
                }
            });

        Self::Api {
            status,
            message,
            details: parsed.filter(|v| !v.is_null()),
        }
    }
}

fn extract_message(body: &Value) -> Option<String> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        let messages: Vec<String> = errors
            .iter()
            .filter_map(|e| {
                let description = e
                    .get("errorDescription")
                    .or_else(|| e.get("message"))
                    .and_then(Value::as_str)?;
                Some(match e.get("errorCode").and_then(Value::as_str) {
                    Some(code) => format!("{} ({})", description, code),
                    None => description.to_string(),
                })
            })
            .collect();
        if !messages.is_empty() {
            return Some(messages.join("; "));
        }
    }

    for key in ["error_description", "error", "message"] {
        match body.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Object(inner)) => {
                if let Some(Value::String(s)) = inner.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }
    None
}

fn default_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unexpected response",
    }
}
