//! Service configuration.
//!
//! Loaded once at startup from environment variables and treated as
//! read-only afterwards. Secrets are held in `SecretString` so they are
//! redacted from `Debug` output.

use common::jwt::{DEFAULT_CLOCK_SKEW, MAX_CLOCK_SKEW};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default access token lifetime (1 hour).
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// Default refresh token lifetime (1 day).
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 86400;

/// Upper bound on either token lifetime (90 days).
pub const MAX_TOKEN_TTL_SECONDS: i64 = 90 * 24 * 60 * 60;

/// Default JWT clock skew tolerance in seconds for iat validation.
pub const DEFAULT_JWT_CLOCK_SKEW_SECONDS: i64 = DEFAULT_CLOCK_SKEW.as_secs() as i64;

/// Default bcrypt cost factor (2^12 iterations, roughly 200ms per hash).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest accepted bcrypt cost (OWASP 2024 minimum).
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest accepted bcrypt cost before login latency becomes unreasonable.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Required length of the application cipher key (AES-256).
pub const APP_SECRET_LEN: usize = 32;

/// Minimum length of the HMAC signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Default key for field encryption. Exactly 32 bytes.
    pub app_secret: SecretString,

    /// Token signing and lifetime settings.
    pub jwt: JwtConfig,

    /// Bcrypt cost factor used when hashing passwords.
    pub bcrypt_cost: u32,

    /// Administrator account seeded into the user store at startup.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Token signing and lifetime settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens.
    pub secret: SecretString,

    /// Lifetime of access tokens in seconds.
    pub access_token_ttl_seconds: i64,

    /// Lifetime of refresh tokens in seconds.
    pub refresh_token_ttl_seconds: i64,

    /// Clock skew tolerance for the iat check.
    pub clock_skew_seconds: i64,
}

/// Credentials for the administrator seeded at startup.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid application secret: {0}")]
    InvalidAppSecret(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid token lifetime configuration: {0}")]
    InvalidTokenTtl(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidJwtClockSkew(String),

    #[error("Invalid bcrypt cost configuration: {0}")]
    InvalidBcryptCost(String),

    #[error("Incomplete bootstrap admin configuration: {0}")]
    IncompleteBootstrapAdmin(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let app_secret = vars
            .get("APP_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("APP_SECRET".to_string()))?;

        if app_secret.len() != APP_SECRET_LEN {
            return Err(ConfigError::InvalidAppSecret(format!(
                "Expected {} bytes, got {}",
                APP_SECRET_LEN,
                app_secret.len()
            )));
        }

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_LEN,
                jwt_secret.len()
            )));
        }

        let access_token_ttl_seconds = parse_seconds(
            vars,
            "JWT_ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            1..=MAX_TOKEN_TTL_SECONDS,
        )
        .map_err(ConfigError::InvalidTokenTtl)?;

        let refresh_token_ttl_seconds = parse_seconds(
            vars,
            "JWT_REFRESH_TOKEN_TTL_SECONDS",
            DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            1..=MAX_TOKEN_TTL_SECONDS,
        )
        .map_err(ConfigError::InvalidTokenTtl)?;

        if refresh_token_ttl_seconds < access_token_ttl_seconds {
            return Err(ConfigError::InvalidTokenTtl(format!(
                "JWT_REFRESH_TOKEN_TTL_SECONDS ({}) must not be shorter than JWT_ACCESS_TOKEN_TTL_SECONDS ({})",
                refresh_token_ttl_seconds, access_token_ttl_seconds
            )));
        }

        let clock_skew_seconds = parse_seconds(
            vars,
            "JWT_CLOCK_SKEW_SECONDS",
            DEFAULT_JWT_CLOCK_SKEW_SECONDS,
            0..=MAX_CLOCK_SKEW.as_secs() as i64,
        )
        .map_err(ConfigError::InvalidJwtClockSkew)?;

        let bcrypt_cost = if let Some(value_str) = vars.get("BCRYPT_COST") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidBcryptCost(format!(
                    "BCRYPT_COST must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&value) {
                return Err(ConfigError::InvalidBcryptCost(format!(
                    "BCRYPT_COST must be between {} and {}, got {}",
                    MIN_BCRYPT_COST, MAX_BCRYPT_COST, value
                )));
            }

            value
        } else {
            DEFAULT_BCRYPT_COST
        };

        let bootstrap_admin = match (
            vars.get("BOOTSTRAP_ADMIN_EMAIL"),
            vars.get("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email: email.clone(),
                password: SecretString::from(password.as_str()),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteBootstrapAdmin(
                    "BOOTSTRAP_ADMIN_PASSWORD is required when BOOTSTRAP_ADMIN_EMAIL is set"
                        .to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteBootstrapAdmin(
                    "BOOTSTRAP_ADMIN_EMAIL is required when BOOTSTRAP_ADMIN_PASSWORD is set"
                        .to_string(),
                ))
            }
        };

        Ok(Config {
            bind_address,
            app_secret: SecretString::from(app_secret.as_str()),
            jwt: JwtConfig {
                secret: SecretString::from(jwt_secret.as_str()),
                access_token_ttl_seconds,
                refresh_token_ttl_seconds,
                clock_skew_seconds,
            },
            bcrypt_cost,
            bootstrap_admin,
        })
    }
}

impl JwtConfig {
    /// Raw signing secret bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

fn parse_seconds(
    vars: &HashMap<String, String>,
    name: &str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, String> {
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: i64 = value_str
        .parse()
        .map_err(|e| format!("{name} must be a valid integer, got '{value_str}': {e}"))?;

    if !range.contains(&value) {
        return Err(format!(
            "{name} must be between {} and {} seconds, got {value}",
            range.start(),
            range.end()
        ));
    }

    Ok(value)
}
