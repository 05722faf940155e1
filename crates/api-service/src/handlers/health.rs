//! Health check handler.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Handler for GET / and GET /public/health
///
/// The service holds no external connections, so it is healthy whenever it
/// can answer.
#[instrument(skip_all, name = "api.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
    })
}
