//! Builder patterns for test tokens
//!
//! Produces signed tokens with arbitrary claims, keys and algorithms so tests
//! can reach every validation branch.

use crate::fixtures::TEST_JWT_SECRET;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builder for test JWTs
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user(&user.id.to_string())
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    exp: i64,
    iat: i64,
    token_type: String,
    algorithm: Algorithm,
    secret: String,
}

impl TestTokenBuilder {
    /// Access token for `test-subject`, valid for an hour, signed with the
    /// test secret.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-subject".to_string(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            token_type: "access".to_string(),
            algorithm: Algorithm::HS512,
            secret: TEST_JWT_SECRET.to_string(),
        }
    }

    /// Set the subject (user id)
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set expiration in seconds from now (negative for expired tokens)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Set the token_type claim ("access", "refresh", or anything else)
    pub fn token_type(mut self, token_type: &str) -> Self {
        self.token_type = token_type.to_string();
        self
    }

    /// Sign with a different HMAC algorithm
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sign with a different secret
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build the claims as a JSON value
    pub fn claims(&self) -> serde_json::Value {
        json!({
            "sub": self.sub,
            "exp": self.exp,
            "iat": self.iat,
            "token_type": self.token_type,
            "jti": uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Build and sign the token
    pub fn sign(self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.claims(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("test token signing should succeed")
    }

    /// Build an unsigned `alg: none` token with an empty signature segment
    pub fn unsigned(self) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(self.claims().to_string());
        format!("{header}.{payload}.")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
