//! Public endpoint tests
//!
//! Health and metrics are reachable without a bearer token.

use api_test_utils::TestApiServer;
use reqwest::StatusCode;

/// Test that the root health endpoint answers without authentication
#[tokio::test]
async fn test_root_health_is_public() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::get(format!("{}/", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "api-service");

    Ok(())
}

/// Test that /public/health answers without authentication
#[tokio::test]
async fn test_public_health_is_public() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::get(format!("{}/public/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Test that a bad token on a public path does not block the request
#[tokio::test]
async fn test_public_path_ignores_bad_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/public/health", server.url()))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Public paths must not reject on token failures"
    );

    Ok(())
}

/// Test that the metrics endpoint serves Prometheus text
#[tokio::test]
async fn test_metrics_endpoint_is_public() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn().await?;

    // Generate at least one request so the recorder has data
    reqwest::get(format!("{}/public/health", server.url())).await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
