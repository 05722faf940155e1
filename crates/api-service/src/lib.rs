//! API Service Library
//!
//! Stateless REST API whose requests are authenticated from bearer tokens:
//!
//! - Token issuance and validation (HS512 JWT)
//! - Per-request authentication filter and path-based access policy
//! - 401/403 JSON error responses
//! - At-rest field cipher (AES-256-GCM)
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Token provider, filter, entry point, access policy
//! - `config` - Service configuration from environment
//! - `crypto` - Field cipher and password hashing
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication, authorization and HTTP metrics layers
//! - `models` - Data models
//! - `observability` - Prometheus metrics
//! - `repositories` - User lookup
//! - `routes` - Axum router setup
//! - `services` - Login, refresh and startup seeding

pub mod auth;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
