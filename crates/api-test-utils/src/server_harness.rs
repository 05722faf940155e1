//! Test server harness for E2E testing
//!
//! Provides TestApiServer for spawning real API server instances in tests.

use crate::fixtures::{test_config, TEST_USER_EMAIL, TEST_USER_PASSWORD};
use api_service::config::Config;
use api_service::crypto::hash_password;
use api_service::models::{Role, TokenType, User};
use api_service::observability::init_metrics_recorder;
use api_service::repositories::InMemoryUserStore;
use api_service::routes::{self, AppState};
use api_service::services::bootstrap::seed_bootstrap_admin;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the API server in E2E tests
///
/// The store is seeded with the bootstrap admin (ADMIN, USER) and one
/// regular user (USER).
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_me() -> Result<()> {
///     let server = TestApiServer::spawn().await?;
///     let token = server.access_token_for(server.user())?;
///
///     let response = reqwest::Client::new()
///         .get(format!("{}/account/me", server.url()))
///         .bearer_auth(token)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestApiServer {
    addr: SocketAddr,
    config: Config,
    state: Arc<AppState>,
    store: Arc<InMemoryUserStore>,
    admin: User,
    user: User,
    _handle: JoinHandle<()>,
}

impl TestApiServer {
    /// Spawn a server with the default test configuration
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_config(test_config()).await
    }

    /// Spawn a server with a custom configuration
    ///
    /// The server binds to a random available port (127.0.0.1:0) and runs in
    /// the background until the harness is dropped with the runtime.
    pub async fn spawn_with_config(config: Config) -> Result<Self, anyhow::Error> {
        let store = Arc::new(InMemoryUserStore::new());

        let admin = seed_bootstrap_admin(&store, &config)
            .map_err(|e| anyhow::anyhow!("Failed to seed admin: {}", e))?
            .ok_or_else(|| anyhow::anyhow!("Test config must define a bootstrap admin"))?;

        let user = store
            .create_user(
                TEST_USER_EMAIL,
                "Test User",
                hash_password(TEST_USER_PASSWORD, config.bcrypt_cost)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?,
                vec![Role::User],
            )
            .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

        let state = Arc::new(
            AppState::new(config.clone(), store.clone())
                .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?,
        );

        // Initialize metrics recorder for test server
        // Note: This may fail if already installed in the test process.
        // In that case, we create a new recorder without installing it globally.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let recorder = PrometheusBuilder::new().build_recorder();
                recorder.handle()
            }
        };

        let app = routes::build_routes(state.clone(), metrics_handle);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            state,
            store,
            admin,
            user,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the user store backing the server
    pub fn store(&self) -> &InMemoryUserStore {
        &self.store
    }

    /// The seeded administrator
    pub fn admin(&self) -> &User {
        &self.admin
    }

    /// The seeded regular user
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Issue a valid access token for `user` with the server's own provider
    pub fn access_token_for(&self, user: &User) -> Result<String, anyhow::Error> {
        self.state
            .token_provider
            .issue(&user.id.to_string(), TokenType::Access)
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }

    /// Issue a valid refresh token for `user`
    pub fn refresh_token_for(&self, user: &User) -> Result<String, anyhow::Error> {
        self.state
            .token_provider
            .issue(&user.id.to_string(), TokenType::Refresh)
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }
}
