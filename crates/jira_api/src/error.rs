//! Error model used by Jira API client operations.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Represents the failures a Jira call can end with: HTTP errors carrying the raw response body, rejected credentials, timeouts, network issues, payload decoding problems and anything else unexpected.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("http {status}: {message}")]
    Http {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl TrackerError {
    /// Constructs an HTTP error variant with optional API-specific code.
    pub fn http(status: StatusCode, code: Option<String>, message: impl Into<String>) -> Self {
        TrackerError::Http {
            status,
            code,
            message: message.into(),
        }
    }

    /// Returns the tracker's error payload when the failure carried a JSON body.
    pub fn raw_payload(&self) -> Option<Value> {
        match self {
            TrackerError::Http { message, .. } => serde_json::from_str::<Value>(message)
                .ok()
                .filter(|value| value.is_object() || value.is_array()),
            TrackerError::Authentication(message) => message
                .split_once(" - ")
                .and_then(|(_, body)| serde_json::from_str::<Value>(body).ok())
                .filter(Value::is_object),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TrackerError {
    /// Converts reqwest errors into semantic TrackerError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TrackerError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            TrackerError::Http {
                status,
                code: None,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TrackerError::Network(err.to_string())
        } else if err.is_decode() {
            TrackerError::Serialization(err.to_string())
        } else {
            TrackerError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    /// Converts serde_json decode/encode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}
