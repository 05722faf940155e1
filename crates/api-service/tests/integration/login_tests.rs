//! Login and refresh tests
//!
//! Tokens issued over HTTP must be accepted by the authentication filter.

use api_test_utils::{
    TestApiServer, TestTokenBuilder, TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD, TEST_USER_EMAIL,
    TEST_USER_PASSWORD,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn login(
    server: &TestApiServer,
    email: &str,
    password: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/auth/login", server.url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?)
}

async fn refresh(server: &TestApiServer, token: &str) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/auth/refresh", server.url()))
        .json(&json!({ "refresh_token": token }))
        .send()
        .await?)
}

// ============================================================================
// Login
// ============================================================================

/// Test that valid credentials produce a usable token pair
#[tokio::test]
async fn test_login_success() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestApiServer::spawn().await?;

    // Act
    let response = login(&server, TEST_USER_EMAIL, TEST_USER_PASSWORD).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(
        body["expires_in"],
        server.config().jwt.access_token_ttl_seconds
    );

    let access_token = body["access_token"].as_str().unwrap();
    let me = reqwest::Client::new()
        .get(format!("{}/account/me", server.url()))
        .bearer_auth(access_token)
        .send()
        .await?;
    assert_eq!(me.status(), StatusCode::OK);
    let me: Value = me.json().await?;
    assert_eq!(me["id"], server.user().id.to_string());

    Ok(())
}

/// Test that the email lookup ignores case
#[tokio::test]
async fn test_login_email_case_insensitive() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = login(
        &server,
        &TEST_ADMIN_EMAIL.to_uppercase(),
        TEST_ADMIN_PASSWORD,
    )
    .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Test that a wrong password and an unknown email look the same
#[tokio::test]
async fn test_login_bad_credentials() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let wrong_password = login(&server, TEST_USER_EMAIL, "not-the-password").await?;
    let unknown_email = login(&server, "nobody@example.com", TEST_USER_PASSWORD).await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await?;
    let b: Value = unknown_email.json().await?;
    assert_eq!(a["code"], "BAD_CREDENTIALS");
    assert_eq!(a["code"], b["code"]);
    assert_eq!(a["message"], b["message"]);

    Ok(())
}

// ============================================================================
// Refresh
// ============================================================================

/// Test that a refresh token from login yields a new pair
#[tokio::test]
async fn test_refresh_success() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.refresh_token_for(server.user())?;

    let response = refresh(&server, &token).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    Ok(())
}

/// Test that an access token is not accepted for refresh
#[tokio::test]
async fn test_refresh_with_access_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.user())?;

    let response = refresh(&server, &token).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Invalid JWT token");

    Ok(())
}

/// Test that an expired refresh token is reported as expired
#[tokio::test]
async fn test_refresh_with_expired_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&server.user().id.to_string())
        .token_type("refresh")
        .issued_at(chrono::Utc::now().timestamp() - 7200)
        .expires_in(-3600)
        .sign();

    let response = refresh(&server, &token).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Expired JWT token");

    Ok(())
}

/// Test that a refresh token for a removed subject is rejected
#[tokio::test]
async fn test_refresh_for_unknown_user() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&uuid::Uuid::new_v4().to_string())
        .token_type("refresh")
        .sign();

    let response = refresh(&server, &token).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "User not found");

    Ok(())
}
