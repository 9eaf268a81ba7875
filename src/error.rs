use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// Every way an append request can fail.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("No data")]
    NoData,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LoggerError {
    pub fn status(&self) -> StatusCode {
        match self {
            LoggerError::Unauthorized => StatusCode::FORBIDDEN,
            LoggerError::NoData | LoggerError::InvalidJson => StatusCode::BAD_REQUEST,
            LoggerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            LoggerError::Unauthorized => "unauthorized",
            LoggerError::NoData => "no_data",
            LoggerError::InvalidJson => "invalid_json",
            LoggerError::Storage(_) => "storage_error",
        }
    }
}

impl IntoResponse for LoggerError {
    fn into_response(self) -> Response {
        // Storage details stay in the logs.
        let message = match &self {
            LoggerError::Storage(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn body_of(err: LoggerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_match_legacy_bodies() {
        assert_eq!(
            body_of(LoggerError::Unauthorized).await,
            (StatusCode::FORBIDDEN, json!({"error": "Unauthorized"}))
        );
        assert_eq!(
            body_of(LoggerError::NoData).await,
            (StatusCode::BAD_REQUEST, json!({"error": "No data"}))
        );
        assert_eq!(
            body_of(LoggerError::InvalidJson).await,
            (StatusCode::BAD_REQUEST, json!({"error": "Invalid JSON"}))
        );
    }

    #[tokio::test]
    async fn storage_error_hides_detail() {
        let err = LoggerError::Storage(StorageError::Write {
            path: PathBuf::from("/secret/location/messages.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.outcome(), "storage_error");

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal Server Error"}));
    }
}
