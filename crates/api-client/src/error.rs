//! Error types for the API client

use optidash_core::ErrorCode;
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key configured
    #[error("Missing API key")]
    MissingApiKey,

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Successful response without the metadata header
    #[error("Response is missing the {0} header")]
    MissingMetadata(&'static str),

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => {
                // Retry on connection errors, timeouts
                e.is_connect() || e.is_timeout()
            }
            Self::ApiResponse { status, .. } => {
                // Retry on 5xx errors and 429 (rate limited)
                *status >= 500 || *status == 429
            }
            Self::Config(_)
            | Self::MissingApiKey
            | Self::Json(_)
            | Self::MissingMetadata(_)
            | Self::InvalidUrl(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// Map onto the shared error code table
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) | Self::InvalidUrl(_) => ErrorCode::ConfigError,
            Self::MissingApiKey => ErrorCode::MissingApiKey,
            Self::ApiResponse { status: 401 | 403, .. } => ErrorCode::Unauthorized,
            Self::Request(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::Request(e) if e.is_connect() => ErrorCode::RemoteUnavailable,
            _ if self.is_server_error() => ErrorCode::RemoteUnavailable,
            Self::RetriesExhausted { .. } => ErrorCode::RemoteUnavailable,
            _ => ErrorCode::RemoteError,
        }
    }
}

/// Error context for better debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation
    pub request_id: Option<String>,
    /// Endpoint that was called
    pub endpoint: String,
    /// HTTP method used
    pub method: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)?;
        if let Some(ref id) = self.request_id {
            write!(f, " (request_id: {id})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(ApiError::api_response(503, "down").is_retryable());
        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert!(!ApiError::api_response(400, "bad file").is_retryable());
        assert!(!ApiError::MissingApiKey.is_retryable());
        assert!(!ApiError::MissingMetadata("X-Optidash-Meta").is_retryable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::api_response(401, "nope").error_code(), ErrorCode::Unauthorized);
        assert_eq!(ApiError::api_response(502, "gw").error_code(), ErrorCode::RemoteUnavailable);
        assert_eq!(ApiError::api_response(422, "bad").error_code(), ErrorCode::RemoteError);
        assert_eq!(ApiError::MissingApiKey.error_code(), ErrorCode::MissingApiKey);
    }

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext {
            request_id: Some("abc".into()),
            endpoint: "https://api.optidash.ai/1.0/upload".into(),
            method: "POST".into(),
        };
        assert_eq!(
            ctx.to_string(),
            "POST https://api.optidash.ai/1.0/upload (request_id: abc)"
        );
    }
}
