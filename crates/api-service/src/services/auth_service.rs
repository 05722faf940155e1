//! Login and token refresh.

use crate::auth::{FailureReason, JwtTokenProvider};
use crate::crypto::verify_password;
use crate::errors::ApiError;
use crate::models::{TokenResponse, TokenType, User};
use crate::observability::metrics::record_login_attempt;
use crate::repositories::UserLookup;
use tracing::instrument;

/// Authenticate with email and password and issue a token pair.
///
/// `dummy_hash` is verified against when the email is unknown, so it must be
/// hashed at the same cost as stored passwords.
///
/// # Errors
///
/// - `BadCredentials` - unknown email, wrong password or disabled account
/// - `Crypto` - bcrypt or signing failure
#[instrument(skip_all)]
pub async fn login(
    provider: &JwtTokenProvider,
    users: &dyn UserLookup,
    dummy_hash: &str,
    email: &str,
    password: &str,
) -> Result<TokenResponse, ApiError> {
    let user = users.find_by_email(email).await?;

    // Always run bcrypt to prevent timing attacks
    let hash_to_verify = match &user {
        Some(u) => u.password_hash.as_str(),
        None => dummy_hash,
    };
    let is_valid = verify_password(password, hash_to_verify)?;

    let user = match user {
        Some(user) if user.enabled && is_valid => user,
        _ => {
            tracing::info!(target: "api.services.auth", "Login rejected");
            record_login_attempt("error");
            return Err(ApiError::BadCredentials);
        }
    };

    record_login_attempt("success");
    tracing::info!(target: "api.services.auth", "Login succeeded");
    issue_pair(provider, &user)
}

/// Exchange a refresh token for a new token pair.
///
/// # Errors
///
/// - `Unauthenticated(reason)` - refresh token rejected, or its subject no
///   longer resolves to an enabled user
#[instrument(skip_all)]
pub async fn refresh(
    provider: &JwtTokenProvider,
    users: &dyn UserLookup,
    refresh_token: &str,
) -> Result<TokenResponse, ApiError> {
    let claims = provider
        .validate(refresh_token, TokenType::Refresh)
        .map_err(|reason| ApiError::Unauthenticated(Some(reason)))?;

    let user = match users
        .find_by_id(JwtTokenProvider::extract_subject(&claims))
        .await
    {
        Ok(Some(user)) if user.enabled => user,
        Ok(_) => {
            tracing::debug!(target: "api.services.auth", "Refresh subject not found or disabled");
            return Err(ApiError::Unauthenticated(Some(FailureReason::NotFound)));
        }
        Err(e) => {
            tracing::warn!(target: "api.services.auth", error = %e, "User lookup failed during refresh");
            return Err(ApiError::Unauthenticated(Some(FailureReason::NotFound)));
        }
    };

    tracing::debug!(target: "api.services.auth", "Refresh token exchanged");
    issue_pair(provider, &user)
}

fn issue_pair(provider: &JwtTokenProvider, user: &User) -> Result<TokenResponse, ApiError> {
    let user_id = user.id.to_string();
    let access_token = provider.issue(&user_id, TokenType::Access)?;
    let refresh_token = provider.issue(&user_id, TokenType::Refresh)?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: provider.ttl_seconds(TokenType::Access).unsigned_abs(),
    })
}
