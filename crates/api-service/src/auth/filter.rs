//! Authentication filter.
//!
//! Turns the `Authorization` header of a request into an [`Authentication`]
//! outcome. The filter never rejects a request itself; token and lookup
//! failures are recorded as a [`FailureReason`] for the access layer and the
//! entry point to act on.

use crate::auth::failure::FailureReason;
use crate::auth::principal::{Authentication, Principal};
use crate::auth::token_provider::JwtTokenProvider;
use crate::models::TokenType;
use crate::repositories::UserLookup;
use axum::http::{header, HeaderMap};
use std::sync::Arc;
use tracing::instrument;

/// Extract the bearer token from request headers.
///
/// Returns `None` when the header is absent, not valid ASCII, or does not
/// use the `Bearer ` scheme.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Per-request authentication step.
#[derive(Clone)]
pub struct JwtAuthenticationFilter {
    token_provider: Arc<JwtTokenProvider>,
    users: Arc<dyn UserLookup>,
}

impl JwtAuthenticationFilter {
    pub fn new(token_provider: Arc<JwtTokenProvider>, users: Arc<dyn UserLookup>) -> Self {
        Self {
            token_provider,
            users,
        }
    }

    /// Authenticate a request from its headers.
    #[instrument(skip_all, name = "api.auth.filter")]
    pub async fn authenticate(&self, headers: &HeaderMap) -> Authentication {
        let Some(token) = extract_bearer_token(headers) else {
            tracing::trace!(target: "api.auth.filter", "No bearer token, request is anonymous");
            return Authentication::Anonymous;
        };

        let claims = match self.token_provider.validate(token, TokenType::Access) {
            Ok(claims) => claims,
            Err(reason) => {
                tracing::debug!(
                    target: "api.auth.filter",
                    reason = reason.as_label(),
                    "Bearer token rejected"
                );
                return Authentication::Failed(reason);
            }
        };

        let user_id = JwtTokenProvider::extract_subject(&claims);
        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) if user.enabled => user,
            Ok(Some(_)) => {
                tracing::debug!(target: "api.auth.filter", "Token subject is disabled");
                return Authentication::Failed(FailureReason::NotFound);
            }
            Ok(None) => {
                tracing::debug!(target: "api.auth.filter", "Token subject not found");
                return Authentication::Failed(FailureReason::NotFound);
            }
            Err(e) => {
                tracing::warn!(target: "api.auth.filter", error = %e, "User lookup failed");
                return Authentication::Failed(FailureReason::NotFound);
            }
        };

        Authentication::Authenticated(Principal::new(user.id.to_string(), user.authorities()))
    }
}
