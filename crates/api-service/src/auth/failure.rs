//! Authentication failure reasons.
//!
//! A request whose bearer token cannot be turned into a principal carries
//! exactly one `FailureReason` until the entry point renders it.

use serde::Serialize;
use thiserror::Error;

/// Why a presented bearer token did not authenticate the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Signature is valid but `exp` is in the past.
    #[error("Expired JWT token")]
    Expired,

    /// Header names an algorithm this service does not accept.
    #[error("Unsupported JWT token")]
    Unsupported,

    /// Signature or claims do not check out.
    #[error("Invalid JWT token")]
    Invalid,

    /// Not a compact JWT at all.
    #[error("Malformed JWT token")]
    Malformed,

    /// Token is valid but its subject does not resolve to an active user.
    #[error("User not found")]
    NotFound,
}

impl FailureReason {
    /// Stable machine-readable code for error bodies and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::Expired => "EXPIRED_TOKEN",
            FailureReason::Unsupported => "UNSUPPORTED_TOKEN",
            FailureReason::Invalid => "INVALID_TOKEN",
            FailureReason::Malformed => "MALFORMED_TOKEN",
            FailureReason::NotFound => "USER_NOT_FOUND",
        }
    }

    /// Bounded label for metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureReason::Expired => "expired",
            FailureReason::Unsupported => "unsupported",
            FailureReason::Invalid => "invalid",
            FailureReason::Malformed => "malformed",
            FailureReason::NotFound => "not_found",
        }
    }
}
