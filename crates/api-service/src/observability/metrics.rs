//! Metrics definitions for the API service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `api_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `token_type`: access, refresh
//! - `status`: success, error
//! - `outcome`: anonymous, authenticated, or one of the five failure reasons
//! - `endpoint`: known routes, `{id}` placeholders, `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and return the handle used by `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("api_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // bcrypt runs in the 50ms-1s range
        .set_buckets_for_metric(
            Matcher::Prefix("api_bcrypt".to_string()),
            &[0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000],
        )
        .map_err(|e| format!("Failed to set bcrypt buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `api_token_issuance_duration_seconds`, `api_token_issuance_total`
/// Labels: `token_type`, `status`
pub fn record_token_issuance(token_type: &str, status: &str, duration: Duration) {
    histogram!("api_token_issuance_duration_seconds", "token_type" => token_type.to_string(), "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("api_token_issuance_total", "token_type" => token_type.to_string(), "status" => status.to_string())
        .increment(1);
}

/// Record token validation result
///
/// Metric: `api_token_validations_total`
/// Labels: `status`, `reason`
pub fn record_token_validation(status: &str, reason: Option<&str>) {
    let reason = reason.unwrap_or("none");
    counter!("api_token_validations_total", "status" => status.to_string(), "reason" => reason.to_string())
        .increment(1);
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record the authentication outcome of a request
///
/// Metric: `api_auth_outcomes_total`
/// Labels: `outcome`
pub fn record_auth_outcome(outcome: &str) {
    counter!("api_auth_outcomes_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record an access policy rejection
///
/// Metric: `api_access_denied_total`
/// Labels: `status_code` (401, 403)
pub fn record_access_denied(status_code: u16) {
    counter!("api_access_denied_total", "status_code" => status_code.to_string()).increment(1);
}

/// Record a login attempt
///
/// Metric: `api_login_attempts_total`
/// Labels: `status`
pub fn record_login_attempt(status: &str) {
    counter!("api_login_attempts_total", "status" => status.to_string()).increment(1);
}

// ============================================================================
// Crypto Metrics
// ============================================================================

/// Record bcrypt operation duration
///
/// Metric: `api_bcrypt_duration_seconds`
/// Labels: `operation` (hash, verify)
pub fn record_bcrypt_duration(operation: &str, duration: Duration) {
    histogram!("api_bcrypt_duration_seconds", "operation" => operation.to_string())
        .record(duration.as_secs_f64());
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `api_http_requests_total`, `api_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);

    histogram!("api_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.clone(),
        "status_code" => status_code.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("api_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Normalize a request path into a bounded endpoint label.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/metrics" | "/public/health" | "/auth/login" | "/auth/refresh"
        | "/account/me" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

fn normalize_dynamic_endpoint(path: &str) -> String {
    // /admin/users/{id}
    if let Some(id) = path.strip_prefix("/admin/users/") {
        if !id.is_empty() && !id.contains('/') {
            return "/admin/users/{id}".to_string();
        }
    }

    "/other".to_string()
}
