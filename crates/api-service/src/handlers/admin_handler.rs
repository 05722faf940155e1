//! Admin endpoints.
//!
//! Reached only by principals holding ADMIN; the access policy enforces it
//! before these handlers run.

use crate::auth::Principal;
use crate::errors::ApiError;
use crate::models::UserResponse;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /admin/users/:id
#[instrument(skip_all, name = "api.handlers.admin.get_user")]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _principal: Principal,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}
