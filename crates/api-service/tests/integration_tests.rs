//! Integration tests for the API service
//!
//! This is the top-level integration test harness that Cargo discovers.
//! Test modules are organized in the integration/ subdirectory.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

#[path = "integration/health_tests.rs"]
mod health_tests;

#[path = "integration/auth_filter_tests.rs"]
mod auth_filter_tests;

#[path = "integration/access_policy_tests.rs"]
mod access_policy_tests;

#[path = "integration/login_tests.rs"]
mod login_tests;
