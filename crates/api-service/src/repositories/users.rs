//! User lookup.
//!
//! `UserLookup` is the seam between authentication and wherever users are
//! stored. The service ships an in-memory store seeded at startup.

use crate::errors::ApiError;
use crate::models::{Role, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Resolves users for the authentication filter and the login flow.
#[async_trait::async_trait]
pub trait UserLookup: Send + Sync {
    /// Find a user by id (the token subject).
    ///
    /// Returns `Ok(None)` for unknown ids, including ids that are not UUIDs.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
}

/// Read-mostly user store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the lock is poisoned.
    pub fn insert(&self, user: User) -> Result<(), ApiError> {
        let mut users = self.users.write().map_err(|_| {
            tracing::error!(target: "api.repositories.users", "User store lock poisoned");
            ApiError::Internal
        })?;
        users.insert(user.id, user);
        Ok(())
    }

    /// Create an enabled user with the given roles and return it.
    pub fn create_user(
        &self,
        email: &str,
        display_name: &str,
        password_hash: String,
        roles: Vec<Role>,
    ) -> Result<User, ApiError> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            password_hash,
            roles,
            enabled: true,
            created_at: Utc::now(),
        };
        self.insert(user.clone())?;

        tracing::debug!(target: "api.repositories.users", "User created");
        Ok(user)
    }

    /// Seed the administrator account (roles ADMIN and USER).
    pub fn seed_admin(&self, email: &str, password_hash: String) -> Result<User, ApiError> {
        self.create_user(email, "Administrator", password_hash, vec![Role::Admin, Role::User])
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl UserLookup for InMemoryUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        let Ok(id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };

        let users = self.users.read().map_err(|_| ApiError::Internal)?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.read().map_err(|_| ApiError::Internal)?;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

/// Mock lookups for testing failure paths.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lookup whose backend is always unavailable.
    #[derive(Default)]
    pub struct FailingUserLookup {
        call_count: AtomicUsize,
    }

    impl FailingUserLookup {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl UserLookup for FailingUserLookup {
        async fn find_by_id(&self, _user_id: &str) -> Result<Option<User>, ApiError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Internal)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, ApiError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Internal)
        }
    }
}
