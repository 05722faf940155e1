//! Bearer token issuance and validation.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS512 is accepted; the header algorithm is inspected first so an
//!   `alg: none` or downgraded token is reported as unsupported
//! - Expiry is enforced with zero leeway, `iat` with the configured skew
//! - Access and refresh tokens are not interchangeable

use crate::auth::claims::Claims;
use crate::auth::failure::FailureReason;
use crate::config::JwtConfig;
use crate::errors::ApiError;
use crate::models::TokenType;
use crate::observability::metrics::{record_token_issuance, record_token_validation};
use chrono::Utc;
use common::jwt::{peek_algorithm, split_segments, validate_iat};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{Duration, Instant};
use tracing::instrument;
use uuid::Uuid;

/// The only signing algorithm this service issues or accepts.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

const SIGNING_ALGORITHM_NAME: &str = "HS512";

/// Issues and validates HS512 bearer tokens.
///
/// Constructed once at startup from the immutable JWT configuration and
/// shared read-only across requests.
pub struct JwtTokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_seconds: i64,
    clock_skew: Duration,
}

impl JwtTokenProvider {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret_bytes();

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_token_ttl_seconds: config.access_token_ttl_seconds,
            refresh_token_ttl_seconds: config.refresh_token_ttl_seconds,
            clock_skew: Duration::from_secs(config.clock_skew_seconds.unsigned_abs()),
        }
    }

    /// Lifetime in seconds of tokens of the given type.
    pub fn ttl_seconds(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_token_ttl_seconds,
            TokenType::Refresh => self.refresh_token_ttl_seconds,
        }
    }

    /// Issue a signed token for `user_id`.
    ///
    /// # Errors
    ///
    /// - `ApiError::Internal` - expiry does not fit in a timestamp
    /// - `ApiError::Crypto` - signing fails
    #[instrument(skip_all, fields(token_type = token_type.as_str()))]
    pub fn issue(&self, user_id: &str, token_type: TokenType) -> Result<String, ApiError> {
        let start = Instant::now();
        let now = Utc::now().timestamp();

        let Some(exp) = now.checked_add(self.ttl_seconds(token_type)) else {
            tracing::error!(target: "api.auth.token", "Token expiry overflows");
            record_token_issuance(token_type.as_str(), "error", start.elapsed());
            return Err(ApiError::Internal);
        };

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp,
            token_type,
            jti: Uuid::new_v4().to_string(),
        };

        let result = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(target: "api.auth.token", error = %e, "Token signing failed");
                ApiError::Crypto("Token signing failed".to_string())
            });

        let status = if result.is_ok() { "success" } else { "error" };
        record_token_issuance(token_type.as_str(), status, start.elapsed());

        result
    }

    /// Validate `token` and require it to be of type `expected`.
    ///
    /// # Errors
    ///
    /// - `Malformed` - oversized, not three base64url segments, or
    ///   undecodable header
    /// - `Unsupported` - header names an algorithm other than HS512
    /// - `Expired` - signature checks out but `exp` has passed
    /// - `Invalid` - any other signature or claim failure
    #[instrument(skip_all, fields(expected = expected.as_str()))]
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, FailureReason> {
        let result = self.check(token, expected);

        match &result {
            Ok(_) => record_token_validation("success", None),
            Err(reason) => record_token_validation("error", Some(reason.as_label())),
        }

        result
    }

    fn check(&self, token: &str, expected: TokenType) -> Result<Claims, FailureReason> {
        let alg = peek_algorithm(token).map_err(|e| {
            tracing::debug!(target: "api.auth.token", error = %e, "Token header rejected");
            FailureReason::Malformed
        })?;

        if alg != SIGNING_ALGORITHM_NAME {
            tracing::debug!(target: "api.auth.token", alg = %alg, "Token algorithm not accepted");
            return Err(FailureReason::Unsupported);
        }

        split_segments(token).map_err(|e| {
            tracing::debug!(target: "api.auth.token", error = %e, "Token structure rejected");
            FailureReason::Malformed
        })?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let reason = classify_decode_error(e.kind());
                tracing::debug!(
                    target: "api.auth.token",
                    error = %e,
                    reason = reason.as_label(),
                    "Token verification failed"
                );
                reason
            })?
            .claims;

        if let Err(e) = validate_iat(claims.iat, self.clock_skew) {
            tracing::debug!(target: "api.auth.token", error = %e, "Token iat validation failed");
            return Err(FailureReason::Invalid);
        }

        if claims.token_type != expected {
            tracing::debug!(
                target: "api.auth.token",
                actual = claims.token_type.as_str(),
                "Token type mismatch"
            );
            return Err(FailureReason::Invalid);
        }

        Ok(claims)
    }

    /// Subject (user id) the token was issued for.
    pub fn extract_subject(claims: &Claims) -> &str {
        &claims.sub
    }
}

/// Map a `jsonwebtoken` failure onto the reason reported to clients.
///
/// The header has already been checked, so JSON errors here come from the
/// claims of a correctly signed token.
fn classify_decode_error(kind: &ErrorKind) -> FailureReason {
    match kind {
        ErrorKind::ExpiredSignature => FailureReason::Expired,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            FailureReason::Unsupported
        }
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            FailureReason::Malformed
        }
        _ => FailureReason::Invalid,
    }
}
