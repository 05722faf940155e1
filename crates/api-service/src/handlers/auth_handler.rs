//! Login and refresh endpoints.

use crate::errors::ApiError;
use crate::models::{LoginRequest, RefreshRequest, TokenResponse};
use crate::routes::AppState;
use crate::services::auth_service;
use axum::{extract::State, Json};
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /auth/login
///
/// ```json
/// { "email": "admin@example.com", "password": "..." }
/// ```
///
/// Returns an access/refresh token pair, or 401 `BAD_CREDENTIALS`.
#[instrument(skip_all, name = "api.handlers.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = auth_service::login(
        &state.token_provider,
        state.users.as_ref(),
        &state.dummy_password_hash,
        &request.email,
        request.password.expose_secret(),
    )
    .await?;

    Ok(Json(response))
}

/// Handler for POST /auth/refresh
///
/// ```json
/// { "refresh_token": "..." }
/// ```
///
/// Returns a new token pair, or 401 with the refresh token's failure reason.
#[instrument(skip_all, name = "api.handlers.refresh")]
pub async fn handle_refresh(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = auth_service::refresh(
        &state.token_provider,
        state.users.as_ref(),
        request.refresh_token.expose_secret(),
    )
    .await?;

    Ok(Json(response))
}
