//! Error types surfaced by the report server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jira_api::TrackerError;
use log::warn;
use thiserror::Error;

use crate::bridge::ErrorBody;
use crate::config::ConfigError;

/// Failures of a single HTTP request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The dashboard sent a time range that cannot be read.
    #[error("invalid range: {0}")]
    InvalidRange(String),
    /// A tracker fetch failed; the whole multi-target response fails with it.
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] TrackerError),
    #[error("export failed: {0}")]
    Export(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Export(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("request failed: {}", self);
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failures while starting the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("tracker client error: {0}")]
    Tracker(#[from] TrackerError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use jira_api::TrackerError;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(ApiError::InvalidRange("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(TrackerError::Timeout("slow".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Export("disk".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
