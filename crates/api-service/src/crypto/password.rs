//! Password encoder (bcrypt).

use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::ApiError;
use crate::observability::metrics::record_bcrypt_duration;
use std::time::Instant;
use tracing::instrument;

/// Hash a password with bcrypt.
///
/// # Errors
///
/// Returns `ApiError::Crypto` if the cost is outside 10-14 or hashing fails.
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ApiError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    let start = Instant::now();
    let result = bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Crypto(format!("Password hashing failed: {}", e)));
    record_bcrypt_duration("hash", start.elapsed());
    result
}

/// Verify a password against a bcrypt hash.
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let start = Instant::now();
    let result = bcrypt::verify(password, hash)
        .map_err(|e| ApiError::Crypto(format!("Password verification failed: {}", e)));
    record_bcrypt_duration("verify", start.elapsed());
    result
}

/// Hash verified against on login when the email is unknown.
///
/// Must be generated at the configured cost so both login paths do the same
/// bcrypt work.
///
/// # Errors
///
/// Same as [`hash_password`].
pub fn dummy_password_hash(cost: u32) -> Result<String, ApiError> {
    hash_password("dummy-password-for-unknown-accounts", cost)
}
