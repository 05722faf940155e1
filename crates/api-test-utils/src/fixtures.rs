//! Deterministic test fixtures
//!
//! Fixed secrets and credentials so tests are reproducible. NEVER use these
//! values outside tests.

use api_service::config::{Config, MIN_BCRYPT_COST};
use std::collections::HashMap;

/// 32-byte cipher key used as `APP_SECRET` in tests.
pub const TEST_APP_SECRET: &str = "0123456789abcdef0123456789abcdef";

/// Signing secret used as `JWT_SECRET` in tests.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough-for-hs512";

/// A different, equally valid signing secret (for wrong-key tests).
pub const WRONG_JWT_SECRET: &str = "wrong-jwt-secret-that-is-also-long-enough-x";

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "admin-password-123";

pub const TEST_USER_EMAIL: &str = "user@example.com";
pub const TEST_USER_PASSWORD: &str = "user-password-123";

/// Environment variables for a valid test configuration.
///
/// Uses the minimum bcrypt cost to keep tests fast.
pub fn test_config_vars() -> HashMap<String, String> {
    HashMap::from([
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("APP_SECRET".to_string(), TEST_APP_SECRET.to_string()),
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("BCRYPT_COST".to_string(), MIN_BCRYPT_COST.to_string()),
        (
            "BOOTSTRAP_ADMIN_EMAIL".to_string(),
            TEST_ADMIN_EMAIL.to_string(),
        ),
        (
            "BOOTSTRAP_ADMIN_PASSWORD".to_string(),
            TEST_ADMIN_PASSWORD.to_string(),
        ),
    ])
}

/// Valid test configuration with a bootstrap admin.
pub fn test_config() -> Config {
    Config::from_vars(&test_config_vars()).expect("test configuration should be valid")
}
