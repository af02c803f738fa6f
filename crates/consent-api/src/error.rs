//! API error type: maps service errors to HTTP status codes and `{"error": message}` bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use consent_types::ConsentServiceError;
use serde::{Deserialize, Serialize};

/// JSON error body returned by every failing consent route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Validation failure, undecodable body, or missing required header (400).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Logged server-side; clients only see a generic message (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ConsentServiceError> for ApiError {
    fn from(err: ConsentServiceError) -> Self {
        match err {
            ConsentServiceError::InvalidRequest(e) => Self::BadRequest(e.to_string()),
            ConsentServiceError::NotFound(_) => Self::NotFound(err.to_string()),
            ConsentServiceError::Store(_) | ConsentServiceError::Snapshot(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_types::{StoreError, ValidationError};
    use http_body_util::BodyExt;

    #[test]
    fn validation_maps_to_bad_request_with_message() {
        let err = ApiError::from(ConsentServiceError::from(ValidationError::NoPermissions));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "At least one permission must be provided.");
    }

    #[test]
    fn not_found_keeps_id_in_message() {
        let err = ApiError::from(ConsentServiceError::NotFound("ACC-1".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Consent not found with ID: ACC-1");
    }

    #[test]
    fn store_failure_is_internal() {
        let err = ApiError::from(ConsentServiceError::from(StoreError::Other(
            "disk full".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_response_hides_details() {
        let res = ApiError::Internal("disk full".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = res.into_body().collect().await.unwrap().to_bytes();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(!text.contains("disk full"));
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "An internal error occurred" }));
    }

    #[tokio::test]
    async fn bad_request_response_carries_message() {
        let res = ApiError::BadRequest("Expiration date is required.".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Expiration date is required.");
    }
}
