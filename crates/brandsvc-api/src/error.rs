//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps contract-layer and domain failures to HTTP status codes and a
//! uniform JSON error body. Internal error details are never exposed to
//! clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use brandsvc_contract::{BindError, ClaimsError, ValidationFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
///
/// All error responses use this format. The `details` field carries the
/// field-addressed issue list for validation failures and is omitted
/// everywhere else.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field issues, present only for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Client data failed contract validation (400). Carries the
    /// aggregated, field-addressed issue list.
    #[error("validation error: {0}")]
    Validation(ValidationFailure),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication failure — missing session cookie (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Session token present but undecodable (400). Distinct from
    /// `Unauthorized`: the client sent a token, it just doesn't verify.
    #[error("token decode error: {0}")]
    TokenDecode(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::TokenDecode(_) => (StatusCode::BAD_REQUEST, "TOKEN_DECODE_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Wrap a response-serialization failure. The handler promised a
    /// shape it did not deliver, so this is a server bug, not a 4xx.
    pub fn serialization(failure: ValidationFailure) -> Self {
        Self::Internal(format!("response serialization failed: {failure}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let details = match &self {
            Self::Validation(failure) => serde_json::to_value(&failure.issues).ok(),
            _ => None,
        };

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::TokenDecode(_) => tracing::warn!(error = %self, "session token rejected"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Binder failures: client data problems become 400, a missing body
/// model declaration is a programming mistake and becomes 500.
impl From<BindError> for AppError {
    fn from(err: BindError) -> Self {
        match err {
            BindError::Validation(failure) => Self::Validation(failure),
            BindError::Config(msg) => Self::Internal(msg),
        }
    }
}

/// Claims failures: an absent cookie is 401, an undecodable token is 400.
impl From<ClaimsError> for AppError {
    fn from(err: ClaimsError) -> Self {
        match err {
            ClaimsError::MissingCookie => Self::Unauthorized(err.to_string()),
            ClaimsError::Decode(msg) => Self::TokenDecode(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn failure() -> ValidationFailure {
        ValidationFailure::single("code", "not a valid string")
    }

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("brand 7 not found".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation(failure());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn conflict_status_code() {
        let err = AppError::Conflict("brand code already exists".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
    }

    #[test]
    fn unauthorized_status_code() {
        let err = AppError::Unauthorized("session cookie is missing".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[test]
    fn token_decode_status_code() {
        let err = AppError::TokenDecode("invalid signature".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "TOKEN_DECODE_ERROR");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("db connection failed".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn bind_validation_converts_to_validation() {
        let err = AppError::from(BindError::Validation(failure()));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn bind_config_converts_to_internal() {
        let err = AppError::from(BindError::Config("no body model declared".to_string()));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn missing_cookie_converts_to_unauthorized() {
        let err = AppError::from(ClaimsError::MissingCookie);
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn decode_failure_converts_to_token_decode() {
        let err = AppError::from(ClaimsError::Decode("bad signature".to_string()));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "TOKEN_DECODE_ERROR");
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::NotFound("brand 123 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("brand 123"));
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_validation_carries_details() {
        let (status, body) = response_parts(AppError::Validation(failure())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        let details = body.error.details.expect("validation details present");
        assert!(details.to_string().contains("code"));
        assert!(details.to_string().contains("not a valid string"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        // The internal error message must NOT appear in the response body.
        assert!(
            !body.error.message.contains("db connection"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[test]
    fn error_body_serializes_without_empty_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(!json.contains("details"));
    }
}
