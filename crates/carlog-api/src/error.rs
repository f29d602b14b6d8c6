//! Maps domain `AppError` and `AuthError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use carlog_auth::AuthError;
use carlog_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by handlers and extractors.
#[derive(Debug)]
pub enum ApiError {
    /// General application failure.
    App(AppError),
    /// Authentication or session failure.
    Auth(AuthError),
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::App(err) => app_error_body(err),
            Self::Auth(AuthError::Internal(err)) => app_error_body(err),
            Self::Auth(err @ AuthError::IdentityConflict(_)) => (
                StatusCode::CONFLICT,
                ApiErrorResponse {
                    error: "CONFLICT".to_string(),
                    message: err.to_string(),
                    details: Some(json!({ "reason": err.reason() })),
                },
            ),
            Self::Auth(err) => (
                StatusCode::UNAUTHORIZED,
                ApiErrorResponse {
                    error: "UNAUTHORIZED".to_string(),
                    message: err.to_string(),
                    details: Some(json!({ "reason": err.reason() })),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn app_error_body(err: AppError) -> (StatusCode, ApiErrorResponse) {
    let (status, error_code) = match err.kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::ExternalService => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization => {
            tracing::error!(kind = %err.kind, error = %err, "Internal server error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorResponse {
                    error: "INTERNAL_ERROR".to_string(),
                    message: "Internal server error".to_string(),
                    details: None,
                },
            );
        }
    };

    (
        status,
        ApiErrorResponse {
            error: error_code.to_string(),
            message: err.message,
            details: None,
        },
    )
}
