//! # API Test Utilities
//!
//! Shared test utilities for the API service.
//!
//! This crate provides:
//! - Deterministic fixtures (fixed secrets, seeded credentials)
//! - Test token builder (arbitrary claims, keys and algorithms)
//! - Server test harness (TestApiServer for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use api_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestApiServer::spawn().await?;
//!
//!     let expired = TestTokenBuilder::new()
//!         .for_user(&server.user().id.to_string())
//!         .expires_in(-60)
//!         .sign();
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
