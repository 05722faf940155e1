//! API error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are fixed strings; underlying causes are logged
//! server-side only.

use crate::auth::entry_point;
use crate::auth::FailureReason;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type.
///
/// Maps to HTTP status codes:
/// - Unauthenticated, BadCredentials: 401 Unauthorized
/// - AccessDenied: 403 Forbidden
/// - NotFound: 404 Not Found
/// - Crypto, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ApiError {
    /// No principal on a route that requires one. Carries the recorded
    /// failure reason, if the request presented a token.
    #[error("Not authenticated")]
    Unauthenticated(Option<FailureReason>),

    #[error("Bad credentials")]
    BadCredentials,

    #[error("Access denied: requires authority {required}")]
    AccessDenied { required: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) | ApiError::BadCredentials => StatusCode::UNAUTHORIZED,
            ApiError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Crypto(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body shared by every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.to_string(),
            status: status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (code, message) = match &self {
            ApiError::Unauthenticated(reason) => return entry_point::commence(*reason),
            ApiError::BadCredentials => ("BAD_CREDENTIALS", "Bad credentials".to_string()),
            ApiError::AccessDenied { required } => {
                tracing::debug!(target: "api.errors", required = %required, "Access denied");
                ("ACCESS_DENIED", "Access denied".to_string())
            }
            ApiError::NotFound(resource) => ("NOT_FOUND", format!("{} not found", resource)),
            ApiError::Crypto(err) => {
                tracing::error!(target: "api.crypto", error = %err, "Cryptographic operation failed");
                (
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            ApiError::Internal => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        (status, Json(ErrorResponse::new(status, code, message))).into_response()
    }
}
