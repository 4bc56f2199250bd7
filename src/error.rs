//! Error types for the Notify client.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Main error type for all Notify operations.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The backend answered with a non-success status.
    ///
    /// `body` holds the parsed JSON body, or the raw text wrapped in a
    /// JSON string when the body was not JSON.
    #[error("HTTP {status}")]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },

    /// The backend could not be reached at all.
    #[error("Cannot connect to server: {0}")]
    Unreachable(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl NotifyError {
    /// HTTP status of the failure, if the backend answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            NotifyError::Status { status, .. } => Some(*status),
            NotifyError::RequestError(e) => e.status(),
            _ => None,
        }
    }

    /// Response body of the failure, if any was captured.
    pub fn body(&self) -> Option<&Value> {
        match self {
            NotifyError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether the failure means the stored session is no longer valid.
    pub fn is_auth_failure(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Whether the server could not be reached.
    pub fn is_unreachable(&self) -> bool {
        match self {
            NotifyError::Unreachable(_) => true,
            NotifyError::RequestError(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

/// Result type alias for Notify operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
