use super::*;
use axum::Router;
use axum::body::Body;
use axum::http::{StatusCode, header};
use std::sync::Arc;
use tower::ServiceExt;

use crate::auth::{AuthError, AuthStateProvider};
use crate::state::test_helpers::app_state_with_auth;

/// Provider with a fixed answer, standing in for any upstream source.
struct FixedAuth(Result<bool, AuthError>);

#[async_trait::async_trait]
impl AuthStateProvider for FixedAuth {
    async fn logged_in(&self, _headers: &axum::http::HeaderMap) -> Result<bool, AuthError> {
        self.0.clone()
    }
}

/// Minimal router: the guard in front of a handler that always says "rendered".
fn guarded(auth: FixedAuth) -> Router {
    let state = app_state_with_auth(Arc::new(auth));
    Router::new()
        .fallback(|| async { "rendered" })
        .layer(axum::middleware::from_fn_with_state(state.clone(), navigation_guard))
        .with_state(state)
}

async fn run(auth: FixedAuth, path: &str) -> Response {
    let request = axum::http::Request::builder().uri(path).body(Body::empty()).unwrap();
    guarded(auth).oneshot(request).await.unwrap()
}

#[tokio::test]
async fn allow_reaches_the_handler() {
    let response = run(FixedAuth(Ok(true)), "/reports").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn redirect_short_circuits_with_302() {
    let response = run(FixedAuth(Ok(false)), "/reports").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn logged_in_login_goes_home() {
    let response = run(FixedAuth(Ok(true)), "/login").await;
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn provider_error_counts_as_logged_out() {
    let response = run(FixedAuth(Err(AuthError::MalformedToken)), "/reports").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

    let response = run(FixedAuth(Err(AuthError::MalformedToken)), "/login").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn page_renders_only_for_get_and_head() {
    for method in [Method::GET, Method::HEAD] {
        let response = page(method, Uri::from_static("/reports")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = page(Method::DELETE, Uri::from_static("/reports")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, HEAD");
}
