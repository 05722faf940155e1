//! Access policy tests
//!
//! `/admin/**` requires the ADMIN authority; everything not public requires
//! an authenticated principal.

use api_test_utils::TestApiServer;
use reqwest::StatusCode;
use serde_json::Value;

/// Test that a regular user is forbidden from admin routes
#[tokio::test]
async fn test_user_forbidden_on_admin_route() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.user())?;

    // Act
    let response = reqwest::Client::new()
        .get(format!("{}/admin/users/{}", server.url(), server.admin().id))
        .bearer_auth(token)
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "ACCESS_DENIED");
    assert_eq!(body["status"], 403);

    Ok(())
}

/// Test that an admin can look up a user
#[tokio::test]
async fn test_admin_can_get_user() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.admin())?;

    let response = reqwest::Client::new()
        .get(format!("{}/admin/users/{}", server.url(), server.user().id))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["id"], server.user().id.to_string());
    assert_eq!(body["email"], server.user().email);
    assert!(
        body.get("password_hash").is_none(),
        "Password hash must never be serialized"
    );

    Ok(())
}

/// Test that an unknown id is 404 for an admin
#[tokio::test]
async fn test_admin_unknown_user_is_404() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.admin())?;

    let response = reqwest::Client::new()
        .get(format!(
            "{}/admin/users/{}",
            server.url(),
            uuid::Uuid::new_v4()
        ))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "NOT_FOUND");

    Ok(())
}

/// Test that anonymous access to an admin route is 401, not 403
#[tokio::test]
async fn test_anonymous_admin_route_is_401() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::get(format!("{}/admin/users/{}", server.url(), server.user().id)).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(
        body["message"],
        "Full authentication is required to access this resource"
    );

    Ok(())
}

/// Test that unmapped paths still require authentication
#[tokio::test]
async fn test_unknown_path_requires_authentication() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let anonymous = reqwest::get(format!("{}/does/not/exist", server.url())).await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = server.access_token_for(server.user())?;
    let authenticated = reqwest::Client::new()
        .get(format!("{}/does/not/exist", server.url()))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(authenticated.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Test that a disabled user's token no longer authenticates
#[tokio::test]
async fn test_disabled_user_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;
    let token = server.access_token_for(server.user())?;

    let mut disabled = server.user().clone();
    disabled.enabled = false;
    server.store().insert(disabled)?;

    let response = reqwest::Client::new()
        .get(format!("{}/account/me", server.url()))
        .bearer_auth(token)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "User not found");

    Ok(())
}
