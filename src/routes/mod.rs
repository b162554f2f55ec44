//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! API, health and asset routes are matched first and are never guarded.
//! Every other request falls through to the page router, which runs the
//! navigation guard in front of all of its routes, including its fallback.

pub mod auth;
pub mod pages;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes, unguarded.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/status", get(auth::status))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/dev-session", post(auth::dev_session))
        .route("/api/auth/logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Navigable pages behind the route guard.
fn page_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login).post(pages::login_submit))
        .route("/logout", post(pages::logout_submit))
        .fallback(pages::page)
        .layer(axum::middleware::from_fn_with_state(state.clone(), pages::navigation_guard))
        .with_state(state)
}

/// Full application router.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    api_routes(state.clone())
        .nest_service("/assets", ServeDir::new(static_dir))
        .fallback_service(page_routes(state))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
