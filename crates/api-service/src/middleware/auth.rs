//! Authentication and authorization middleware.
//!
//! `authenticate` runs the filter and stores the [`Authentication`] outcome
//! in request extensions. `authorize` reads it back and applies the access
//! policy. Both are applied to the whole router, `authenticate` outermost.

use crate::auth::{AccessPolicy, Authentication, JwtAuthenticationFilter};
use crate::observability::metrics::{record_access_denied, record_auth_outcome};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::instrument;

/// Runs the authentication filter and always forwards the request.
#[instrument(skip_all, name = "api.middleware.authenticate")]
pub async fn authenticate(
    State(filter): State<Arc<JwtAuthenticationFilter>>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = filter.authenticate(req.headers()).await;
    record_auth_outcome(outcome.as_label());

    req.extensions_mut().insert(outcome);
    next.run(req).await
}

/// Applies the access policy to the outcome recorded by `authenticate`.
///
/// # Response
///
/// - 401 via the entry point if the path needs a principal and there is none
/// - 403 if the principal lacks the required authority
#[instrument(skip_all, name = "api.middleware.authorize")]
pub async fn authorize(
    State(policy): State<Arc<AccessPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let decision = match req.extensions().get::<Authentication>() {
        Some(outcome) => policy.decide(req.uri().path(), outcome),
        None => policy.decide(req.uri().path(), &Authentication::Anonymous),
    };

    if let Err(e) = decision {
        tracing::debug!(
            target: "api.middleware.authorize",
            status = e.status_code().as_u16(),
            "Request rejected by access policy"
        );
        record_access_denied(e.status_code().as_u16());
        return e.into_response();
    }

    next.run(req).await
}
