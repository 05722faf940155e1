//! Path-based access policy.
//!
//! Rules are evaluated in order and the first matching pattern decides.
//! Patterns are exact paths or a prefix followed by `/**`, which matches the
//! prefix itself and everything below it.

use crate::auth::principal::Authentication;
use crate::errors::ApiError;
use crate::models::Role;

/// Authority required to reach the admin area.
pub const ADMIN_AUTHORITY: &str = "ADMIN";

/// What a matched path requires of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    PermitAll,
    Authenticated,
    Authority(String),
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    pattern: String,
    requirement: Requirement,
}

impl AccessRule {
    pub fn new(pattern: impl Into<String>, requirement: Requirement) -> Self {
        Self {
            pattern: pattern.into(),
            requirement,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self.pattern.strip_suffix("/**") {
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => path == self.pattern,
        }
    }
}

/// Ordered access rules with an authenticated-by-default fallback.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::default_rules()
    }
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Public pages, auth endpoints, docs and static assets are open;
    /// `/admin/**` needs ADMIN; everything else needs a principal.
    pub fn default_rules() -> Self {
        let public = [
            "/",
            "/auth/**",
            "/public/**",
            "/assets/**",
            "/api-docs/**",
            "/swagger-ui/**",
            "/webjars/**",
            "/metrics",
        ];

        let mut rules: Vec<AccessRule> = public
            .into_iter()
            .map(|p| AccessRule::new(p, Requirement::PermitAll))
            .collect();
        rules.push(AccessRule::new(
            "/admin/**",
            Requirement::Authority(Role::Admin.as_str().to_string()),
        ));

        Self::new(rules)
    }

    /// Requirement for `path`; unmatched paths require authentication.
    pub fn requirement_for(&self, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map_or(&Requirement::Authenticated, |rule| &rule.requirement)
    }

    /// Admit or reject a request.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` - path needs a principal and there is none; carries
    ///   the recorded failure reason if a token was presented
    /// - `AccessDenied` - principal lacks the required authority
    pub fn decide(&self, path: &str, authentication: &Authentication) -> Result<(), ApiError> {
        let requirement = self.requirement_for(path);
        if *requirement == Requirement::PermitAll {
            return Ok(());
        }

        let Some(principal) = authentication.principal() else {
            return Err(ApiError::Unauthenticated(authentication.failure()));
        };

        match requirement {
            Requirement::Authority(authority) if !principal.has_authority(authority) => {
                Err(ApiError::AccessDenied {
                    required: authority.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
