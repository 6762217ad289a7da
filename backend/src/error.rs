//! Application error handling
//!
//! Every error leaves the API as `{"error": message, "code": CODE}`, the same
//! `{error}` shape the recommendation contract promises, plus a stable code.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use health_calculators_shared::GatewayError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidSnapshot(_) => ApiError::Validation(err.to_string()),
            GatewayError::Disabled => ApiError::ServiceUnavailable(err.to_string()),
            GatewayError::Upstream(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg.clone())
            }
            ApiError::Upstream(msg) => {
                warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::Validation("Invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_gateway_error_mapping() {
        let disabled: ApiError = GatewayError::Disabled.into();
        assert_eq!(disabled.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let upstream: ApiError = GatewayError::Upstream("timed out".to_string()).into();
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_GATEWAY);

        let invalid: ApiError = GatewayError::InvalidSnapshot("missing BMI".to_string()).into();
        assert!(matches!(invalid, ApiError::Validation(ref m) if m == "Invalid snapshot: missing BMI"));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Upstream("model not found".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "model not found");
        assert_eq!(json["code"], "UPSTREAM_ERROR");
    }
}
