//! Authentication entry point.
//!
//! Renders the 401 response for a request that reached a protected route
//! without an authenticated principal.

use crate::auth::failure::FailureReason;
use crate::errors::ErrorResponse;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Message used when the request presented no token at all.
pub const GENERIC_MESSAGE: &str = "Full authentication is required to access this resource";

const GENERIC_CODE: &str = "UNAUTHORIZED";

/// Resolve the client-facing message and code for a recorded reason.
pub fn resolve(reason: Option<FailureReason>) -> (&'static str, String) {
    match reason {
        Some(reason) => (reason.code(), reason.to_string()),
        None => (GENERIC_CODE, GENERIC_MESSAGE.to_string()),
    }
}

/// Build the 401 response for `reason`.
///
/// Output depends only on `reason` (apart from the body timestamp).
pub fn commence(reason: Option<FailureReason>) -> Response {
    let (code, message) = resolve(reason);

    tracing::debug!(target: "api.auth.entry_point", code = code, message = %message, "Authentication required");

    let body = ErrorResponse::new(StatusCode::UNAUTHORIZED, code, message);
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();

    let www_authenticate = match reason {
        Some(_) => HeaderValue::from_static("Bearer error=\"invalid_token\""),
        None => HeaderValue::from_static("Bearer"),
    };
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, www_authenticate);

    response
}
