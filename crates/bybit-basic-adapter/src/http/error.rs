/*
[INPUT]:  Error sources (HTTP transport, API envelope, serialization, config)
[OUTPUT]: Structured error types with failure classification
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or retCode mappings
*/

use reqwest::StatusCode;
use thiserror::Error;

/// retCodes the exchange uses for credential / permission problems
const AUTH_RET_CODES: &[i64] = &[10003, 10004, 10005, 10007, 10010, 33004];

/// retCodes the exchange uses for throttling
const RATE_LIMIT_RET_CODES: &[i64] = &[10006, 10018];

/// Main error type for the Bybit adapter
#[derive(Error, Debug)]
pub enum BybitError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Exchange answered with a non-zero retCode
    #[error("API error (retCode {code}): {message}")]
    Api { code: i64, message: String },

    /// Exchange answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure class used by callers to decide how to report an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The exchange rejected the parameters (symbol, qty, price precision...)
    InvalidRequest,
    /// Bad key, bad signature, missing permission
    Authentication,
    /// Too many requests
    RateLimit,
    /// Anything else
    Unexpected,
}

impl BybitError {
    /// Classify the error for reporting
    pub fn kind(&self) -> FailureKind {
        match self {
            BybitError::Api { code, .. } => {
                if AUTH_RET_CODES.contains(code) {
                    FailureKind::Authentication
                } else if RATE_LIMIT_RET_CODES.contains(code) {
                    FailureKind::RateLimit
                } else {
                    FailureKind::InvalidRequest
                }
            }
            BybitError::Status { status, .. } => match *status {
                401 | 403 => FailureKind::Authentication,
                429 => FailureKind::RateLimit,
                400 => FailureKind::InvalidRequest,
                _ => FailureKind::Unexpected,
            },
            BybitError::Http(err) => match err.status() {
                Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => {
                    FailureKind::Authentication
                }
                Some(StatusCode::TOO_MANY_REQUESTS) => FailureKind::RateLimit,
                _ => FailureKind::Unexpected,
            },
            _ => FailureKind::Unexpected,
        }
    }

    /// Create a status error from an HTTP status and response body
    pub fn status_error(status: StatusCode, body: impl Into<String>) -> Self {
        BybitError::Status {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for Bybit operations
pub type Result<T> = std::result::Result<T, BybitError>;
