// Error taxonomy for the scan pipeline and reporting surface.
// Validation and upstream failures map to distinct status codes so a
// caller can tell "bad input" from "oracle unavailable" and retry
// accordingly. Cache failures never appear here: the cache degrades
// silently to a permanent miss.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream oracle error: {0}")]
    Upstream(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ScanError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ScanError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ScanError::Persistence(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ScanError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ScanError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Conversion from various error types
impl From<diesel::result::Error> for ScanError {
    fn from(error: diesel::result::Error) -> Self {
        ScanError::Database(error.to_string())
    }
}

impl From<validator::ValidationErrors> for ScanError {
    fn from(_error: validator::ValidationErrors) -> Self {
        ScanError::Validation("url is required".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_distinguish_retry_semantics() {
        let validation = ScanError::Validation("url is required".into()).into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let upstream = ScanError::Upstream("ml oracle timed out".into()).into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let persistence = ScanError::Persistence("insert failed".into()).into_response();
        assert_eq!(persistence.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
