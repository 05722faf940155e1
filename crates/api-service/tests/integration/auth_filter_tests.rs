//! Bearer token authentication tests
//!
//! Each rejected token must surface its own message in the 401 body, and a
//! request without a token gets the generic message.

use api_test_utils::{TestApiServer, TestTokenBuilder, WRONG_JWT_SECRET};
use jsonwebtoken::Algorithm;
use reqwest::{header, StatusCode};
use serde_json::Value;

const GENERIC_MESSAGE: &str = "Full authentication is required to access this resource";

/// GET /account/me with an optional bearer token; returns status and body.
async fn get_me(
    server: &TestApiServer,
    token: Option<&str>,
) -> Result<(StatusCode, Value), anyhow::Error> {
    let mut request = reqwest::Client::new().get(format!("{}/account/me", server.url()));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await?;
    Ok((status, body))
}

// ============================================================================
// Successful authentication
// ============================================================================

/// Test that a valid access token reaches the handler with the principal
#[tokio::test]
async fn test_valid_token_attaches_principal() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.user())?;

    // Act
    let (status, body) = get_me(&server, Some(&token)).await?;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], server.user().id.to_string());
    assert_eq!(body["authorities"], serde_json::json!(["USER"]));

    Ok(())
}

/// Test that the admin principal carries both authorities
#[tokio::test]
async fn test_admin_token_carries_admin_authority() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.admin())?;

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::OK);
    let authorities = body["authorities"].as_array().cloned().unwrap_or_default();
    assert!(authorities.contains(&Value::from("ADMIN")));
    assert!(authorities.contains(&Value::from("USER")));

    Ok(())
}

// ============================================================================
// Missing token
// ============================================================================

/// Test that a protected path without a token gets the generic 401
#[tokio::test]
async fn test_missing_token_returns_generic_401() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::get(format!("{}/account/me", server.url())).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let body: Value = response.json().await?;
    assert_eq!(body["message"], GENERIC_MESSAGE);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["status"], 401);

    Ok(())
}

/// Test that a non-Bearer scheme is treated as no token
#[tokio::test]
async fn test_basic_scheme_is_anonymous() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/account/me", server.url()))
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], GENERIC_MESSAGE);

    Ok(())
}

// ============================================================================
// Rejected tokens
// ============================================================================

/// Test that an expired token is reported as expired
#[tokio::test]
async fn test_expired_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&server.user().id.to_string())
        .issued_at(chrono::Utc::now().timestamp() - 7200)
        .expires_in(-3600)
        .sign();

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Expired JWT token");
    assert_eq!(body["code"], "EXPIRED_TOKEN");

    Ok(())
}

/// Test that a token signed with another key is invalid
#[tokio::test]
async fn test_wrong_key_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&server.user().id.to_string())
        .signed_with(WRONG_JWT_SECRET)
        .sign();

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid JWT token");

    Ok(())
}

/// Test that garbage in the bearer slot is malformed
#[tokio::test]
async fn test_malformed_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    for token in ["not-a-jwt", "a.b", "a.b.c.d"] {
        let (status, body) = get_me(&server, Some(token)).await?;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token:?}");
        assert_eq!(body["message"], "Malformed JWT token", "token {token:?}");
    }

    Ok(())
}

/// Test that an unsigned token is rejected as unsupported
#[tokio::test]
async fn test_alg_none_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&server.user().id.to_string())
        .unsigned();

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unsupported JWT token");

    Ok(())
}

/// Test that a token signed with a different HMAC algorithm is unsupported
#[tokio::test]
async fn test_hs256_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&server.user().id.to_string())
        .algorithm(Algorithm::HS256)
        .sign();

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unsupported JWT token");

    Ok(())
}

/// Test that a refresh token cannot be used as an access token
#[tokio::test]
async fn test_refresh_token_as_access() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.refresh_token_for(server.user())?;

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid JWT token");

    Ok(())
}

/// Test that a valid token for an unknown subject reports user not found
#[tokio::test]
async fn test_unknown_subject() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = TestTokenBuilder::new()
        .for_user(&uuid::Uuid::new_v4().to_string())
        .sign();

    let (status, body) = get_me(&server, Some(&token)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");
    assert_eq!(body["code"], "USER_NOT_FOUND");

    Ok(())
}

/// Test that a rejected token sets the invalid_token challenge
#[tokio::test]
async fn test_rejected_token_challenge_header() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/account/me", server.url()))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer error=\"invalid_token\"")
    );

    Ok(())
}

// ============================================================================
// Request isolation
// ============================================================================

/// Test that a failure reason does not leak into the next request
#[tokio::test]
async fn test_failure_reason_is_per_request() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let expired = TestTokenBuilder::new()
        .for_user(&server.user().id.to_string())
        .issued_at(chrono::Utc::now().timestamp() - 7200)
        .expires_in(-3600)
        .sign();

    let (_, first) = get_me(&server, Some(&expired)).await?;
    assert_eq!(first["message"], "Expired JWT token");

    let (status, second) = get_me(&server, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        second["message"], GENERIC_MESSAGE,
        "Anonymous request must not inherit a previous reason"
    );

    let valid = server.access_token_for(server.user())?;
    let (status, _) = get_me(&server, Some(&valid)).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}
