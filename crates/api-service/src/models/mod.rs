use chrono::{DateTime, Utc};
use common::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role granted to a user. The role name doubles as the granted authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record as held by the user store.
///
/// `password_hash` is a bcrypt hash; the Debug impl omits it.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("password_hash", &"[REDACTED]")
            .field("roles", &self.roles)
            .field("enabled", &self.enabled)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl User {
    /// Granted authorities, one per role.
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

/// Kind of bearer token. Each kind has its own lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Refresh request body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: SecretString,
}

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// User view exposed over HTTP (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<Role>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            roles: user.roles.clone(),
            enabled: user.enabled,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            password_hash: "$2b$12$secret-hash".to_string(),
            roles: vec![Role::Admin, Role::User],
            enabled: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_display_is_authority_name() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(Role::User.to_string(), "USER");
    }

    #[test]
    fn test_role_serializes_as_authority_name() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenType::Refresh).unwrap(),
            "\"refresh\""
        );
        let parsed: TokenType = serde_json::from_str("\"access\"").unwrap();
        assert_eq!(parsed, TokenType::Access);
    }

    #[test]
    fn test_user_authorities() {
        assert_eq!(sample_user().authorities(), vec!["ADMIN", "USER"]);
    }

    #[test]
    fn test_user_debug_redacts_password_hash() {
        let debug_str = format!("{:?}", sample_user());
        assert!(!debug_str.contains("secret-hash"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let json = serde_json::to_string(&UserResponse::from(&sample_user())).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"email\":\"alice@example.com\""));
    }
}
