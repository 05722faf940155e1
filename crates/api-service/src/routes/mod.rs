//! HTTP routes for the API service.
//!
//! Defines the Axum router and application state.

use crate::auth::{AccessPolicy, JwtAuthenticationFilter, JwtTokenProvider};
use crate::config::Config;
use crate::crypto::{dummy_password_hash, CipherService};
use crate::errors::ApiError;
use crate::handlers::{self, admin_handler, auth_handler};
use crate::middleware::{authenticate, authorize, http_metrics_middleware};
use crate::repositories::UserLookup;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token issuance and validation.
    pub token_provider: Arc<JwtTokenProvider>,

    /// User store.
    pub users: Arc<dyn UserLookup>,

    /// Field cipher keyed by `APP_SECRET`.
    pub cipher: Arc<CipherService>,

    /// Per-request authentication step.
    pub auth_filter: Arc<JwtAuthenticationFilter>,

    /// Path rules applied after authentication.
    pub access_policy: Arc<AccessPolicy>,

    /// Login hash for unknown emails, at the configured bcrypt cost.
    pub dummy_password_hash: Arc<str>,
}

impl AppState {
    /// Build the state from configuration. Keys are read once here.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Crypto` if the login dummy hash cannot be generated.
    pub fn new(config: Config, users: Arc<dyn UserLookup>) -> Result<Self, ApiError> {
        let token_provider = Arc::new(JwtTokenProvider::new(&config.jwt));
        let cipher = Arc::new(CipherService::new(&config));
        let auth_filter = Arc::new(JwtAuthenticationFilter::new(
            token_provider.clone(),
            users.clone(),
        ));

        let dummy_password_hash = Arc::from(dummy_password_hash(config.bcrypt_cost)?);

        Ok(Self {
            config,
            token_provider,
            users,
            cipher,
            auth_filter,
            access_policy: Arc::new(AccessPolicy::default_rules()),
            dummy_password_hash,
        })
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/`, `/public/health` - health check
/// - `/auth/login`, `/auth/refresh` - token issuance
/// - `/account/me` - current principal
/// - `/admin/users/:id` - user lookup (ADMIN)
/// - `/metrics` - Prometheus scrape endpoint
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route("/", get(handlers::health_check))
        .route("/public/health", get(handlers::health_check))
        .route("/auth/login", post(auth_handler::handle_login))
        .route("/auth/refresh", post(auth_handler::handle_refresh))
        .route("/account/me", get(handlers::get_me))
        .route("/admin/users/:id", get(admin_handler::get_user))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. http_metrics_middleware - outermost, sees every response
    // 2. TimeoutLayer - 30 second request timeout
    // 3. TraceLayer - request logging
    // 4. authenticate - records the authentication outcome
    // 5. authorize - access policy (innermost)
    api_routes
        .merge(metrics_routes)
        .layer(from_fn_with_state(state.access_policy.clone(), authorize))
        .layer(from_fn_with_state(state.auth_filter.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(from_fn(http_metrics_middleware))
}
