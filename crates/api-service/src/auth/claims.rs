//! JWT claims structure.
//!
//! The `sub` field is redacted in Debug output to prevent exposure in logs.

use crate::models::TokenType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims carried by every bearer token issued by this service.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id) - redacted in Debug output.
    pub sub: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Access or refresh.
    pub token_type: TokenType,

    /// Unique token id.
    pub jti: String,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .field("token_type", &self.token_type)
            .field("jti", &self.jti)
            .finish()
    }
}
