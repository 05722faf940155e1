//! Authenticated principal and the per-request authentication outcome.

use crate::auth::failure::FailureReason;
use crate::errors::ApiError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::fmt;

/// Identity attached to a request whose bearer token checked out.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            authorities,
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("user_id", &"[REDACTED]")
            .field("authorities", &self.authorities)
            .finish()
    }
}

/// Result of running the authentication filter over one request.
///
/// Exactly one variant holds per request. A request without a bearer token
/// is `Anonymous`, never `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Authentication {
    #[default]
    Anonymous,
    Authenticated(Principal),
    Failed(FailureReason),
}

impl Authentication {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Authentication::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            Authentication::Failed(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Bounded label for metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Authentication::Anonymous => "anonymous",
            Authentication::Authenticated(_) => "authenticated",
            Authentication::Failed(reason) => reason.as_label(),
        }
    }
}

/// Handlers take `Principal` as an argument to require authentication.
///
/// Rejects with the entry point response, carrying the recorded failure
/// reason when there is one.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Authentication>() {
            Some(Authentication::Authenticated(principal)) => Ok(principal.clone()),
            Some(Authentication::Failed(reason)) => Err(ApiError::Unauthenticated(Some(*reason))),
            Some(Authentication::Anonymous) | None => Err(ApiError::Unauthenticated(None)),
        }
    }
}
