//! Current principal handler.

use crate::auth::Principal;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Response for `/account/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// User id (token subject).
    pub id: String,

    /// Granted authorities.
    pub authorities: Vec<String>,
}

/// Handler for GET /account/me
///
/// Returns the principal attached by the authentication filter.
#[instrument(skip_all, name = "api.handlers.me")]
pub async fn get_me(principal: Principal) -> Json<MeResponse> {
    Json(MeResponse {
        id: principal.user_id,
        authorities: principal.authorities,
    })
}
