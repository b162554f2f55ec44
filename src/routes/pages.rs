//! Page routes and the navigation guard middleware.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page request passes through `navigation_guard` before a handler
//! runs, whatever its method. The guard sees only the request path and the
//! login flag; a redirect short-circuits with `302 Found`, anything else
//! falls through to the handlers below.
//!
//! Pages render for `GET` and `HEAD` only. The login and logout forms post
//! back to page paths and answer `303 See Other` so the browser navigates.

use axum::extract::{Form, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::ApiError;
use crate::guard::{self, Decision, HOME_PATH, LOGIN_PATH};
use crate::render;
use crate::routes::auth::{end_session, start_session};
use crate::services::user::NewUser;
use crate::state::AppState;

/// Which button submitted the login form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginIntent {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub intent: LoginIntent,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Middleware: evaluate the route guard for the requested path.
pub async fn navigation_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let logged_in = state.logged_in(request.headers()).await;
    let path = request.uri().path().to_owned();

    match guard::evaluate(&path, logged_in) {
        Decision::Allow => next.run(request).await,
        Decision::Redirect(redirect) => {
            tracing::debug!(%path, location = redirect.location, logged_in, "navigation redirected");
            redirect.into_response()
        }
    }
}

/// `GET /`: home page.
pub async fn home() -> Html<String> {
    Html(render::home_page())
}

/// `GET /login`: login page.
pub async fn login(State(state): State<AppState>) -> Html<String> {
    Html(render::login_page(state.dev_auth_bypass, None))
}

/// `POST /login`: log in or register from the login form, then go home.
///
/// A failed attempt re-renders the login page with the error and the
/// matching status.
pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let result = match form.intent {
        LoginIntent::Login => state.users.authenticate(&form.email, &form.password).await,
        LoginIntent::Register => {
            state
                .users
                .register(NewUser {
                    email: form.email.clone(),
                    first_name: form.first_name,
                    last_name: form.last_name,
                    password: form.password,
                })
                .await
        }
    };

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, intent = ?form.intent, "logged in from form");
            let jar = start_session(&state, jar, Some(user.id)).await;
            (jar, Redirect::to(HOME_PATH)).into_response()
        }
        Err(e) => {
            tracing::info!(email = %form.email, intent = ?form.intent, "login form rejected");
            let err = ApiError::from(e);
            let html = render::login_page(state.dev_auth_bypass, Some(err.message()));
            (err.status(), Html(html)).into_response()
        }
    }
}

/// `POST /logout`: end the session and go to the login page.
pub async fn logout_submit(State(state): State<AppState>, jar: CookieJar, headers: HeaderMap) -> Response {
    let jar = end_session(&state, jar, &headers).await;
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

/// Any other path: generic page named after the path.
pub async fn page(method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET, HEAD")]).into_response();
    }
    Html(render::generic_page(uri.path())).into_response()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
