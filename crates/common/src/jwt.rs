//! JWT utilities shared across services.
//!
//! This module provides the structural checks that run before any signature
//! verification:
//! - Size limits for DoS prevention
//! - Compact-serialization shape (three base64url segments)
//! - Header algorithm inspection
//! - iat validation with clock skew tolerance
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - The header is inspected without trusting it; the caller still has to
//!   verify the signature with its own key and algorithm
//! - Error messages are generic, details go to debug logs
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{peek_algorithm, split_segments, validate_iat, DEFAULT_CLOCK_SKEW};
//!
//! let alg = peek_algorithm(token)?;
//! if alg != "HS512" {
//!     return Err(Unsupported);
//! }
//! split_segments(token)?;
//! // ... verify signature, then:
//! validate_iat(claims.iat, DEFAULT_CLOCK_SKEW)?;
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected before base64 decoding or any
/// cryptographic work. Typical access tokens issued by this workspace are
/// around 300 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Default JWT clock skew tolerance (5 minutes per NIST SP 800-63B).
///
/// Tokens with `iat` (issued-at) timestamps more than this amount in the
/// future are rejected.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

/// Maximum allowed JWT clock skew tolerance (10 minutes).
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

// =============================================================================
// Error Types
// =============================================================================

/// Structural errors detected before signature verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("JWT exceeds the maximum allowed size")]
    TokenTooLarge,

    /// Token is not three base64url segments with a JSON header.
    #[error("JWT is malformed")]
    MalformedToken,

    /// Header carries no usable `alg` field.
    #[error("JWT header has no algorithm")]
    MissingAlgorithm,

    /// Token `iat` claim is too far in the future.
    #[error("JWT issued-at is too far in the future")]
    IatTooFarInFuture,
}

// =============================================================================
// Functions
// =============================================================================

/// Split a compact JWT into its three segments.
///
/// Every segment must be non-empty and valid base64url without padding.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - Wrong segment count, empty segment or bad base64url
pub fn split_segments(token: &str) -> Result<[&str; 3], JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let parts: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = parts.as_slice() else {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    };

    for segment in [header, payload, signature] {
        if segment.is_empty() || URL_SAFE_NO_PAD.decode(segment).is_err() {
            tracing::debug!(target: "common.jwt", "Token rejected: segment is not base64url");
            return Err(JwtValidationError::MalformedToken);
        }
    }

    Ok([*header, *payload, *signature])
}

/// Read the `alg` header field without verifying the signature.
///
/// Used to tell an unsupported algorithm apart from a bad signature. Only the
/// header segment is decoded here, so an unsigned `alg: none` token (empty
/// signature segment) still reports its algorithm. The returned value MUST
/// NOT be used to choose a verification key.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - Not three segments, or the header is not a base64url
///   JSON object
/// - `MissingAlgorithm` - header JSON has no string `alg`
pub fn peek_algorithm(token: &str) -> Result<String, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        return Err(JwtValidationError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    let (Some(header_part), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(target: "common.jwt", "Token rejected: invalid JWT format");
        return Err(JwtValidationError::MalformedToken);
    };

    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtValidationError::MalformedToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtValidationError::MalformedToken
    })?;

    if !header.is_object() {
        return Err(JwtValidationError::MalformedToken);
    }

    header
        .get("alg")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(JwtValidationError::MissingAlgorithm)
}

/// Validate the `iat` (issued-at) claim with clock skew tolerance.
///
/// Rejects tokens with `iat` more than `clock_skew` in the future.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` when the check fails.
pub fn validate_iat(iat: i64, clock_skew: Duration) -> Result<(), JwtValidationError> {
    let now = chrono::Utc::now().timestamp();
    validate_iat_at(iat, clock_skew, now)
}

/// Deterministic `iat` validation against an explicit `now` timestamp.
pub(crate) fn validate_iat_at(
    iat: i64,
    clock_skew: Duration,
    now: i64,
) -> Result<(), JwtValidationError> {
    // clock_skew is bounded to MAX_CLOCK_SKEW by configuration
    #[allow(clippy::cast_possible_wrap)]
    let clock_skew_secs = clock_skew.as_secs() as i64;
    let max_iat = now + clock_skew_secs;

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            clock_skew_secs = clock_skew_secs,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
