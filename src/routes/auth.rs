//! Auth routes: registration, credential login, current user, dev sessions,
//! logout.
//!
//! JSON endpoints answer with problem details on failure. The dev-session
//! endpoint is a form target and answers with a redirect.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use crate::auth::{COOKIE_NAME, session_token};
use crate::error::{ApiError, ErrorType};
use crate::guard::HOME_PATH;
use crate::services::user::{NewUser, UserProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub logged_in: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Create a session and add its cookie to `jar`.
pub(crate) async fn start_session(state: &AppState, jar: CookieJar, user_id: Option<Uuid>) -> CookieJar {
    let token = state.sessions.create(user_id).await;
    jar.add(session_cookie(token, state.cookie_secure))
}

/// Delete the request's session, if any, and clear its cookie.
pub(crate) async fn end_session(state: &AppState, jar: CookieJar, headers: &HeaderMap) -> CookieJar {
    if let Some(token) = session_token(headers) {
        let existed = state.sessions.remove(&token).await;
        tracing::debug!(existed, "session removed");
    }

    let mut cleared = session_cookie(String::new(), state.cookie_secure);
    cleared.set_max_age(Duration::ZERO);
    jar.add(cleared)
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::new(ErrorType::ValidationError).detail(rejection.body_text())
}

// =============================================================================
// CURRENT USER EXTRACTOR
// =============================================================================

/// User behind the request's session. Use as a handler parameter to require
/// a logged-in user.
pub struct CurrentUser(pub UserProfile);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let not_logged_in = || ApiError::new(ErrorType::Unauthorized).detail("You are not logged in.");

        if !app_state.logged_in(&parts.headers).await {
            return Err(not_logged_in());
        }
        let token = session_token(&parts.headers).ok_or_else(not_logged_in)?;
        let session = app_state.sessions.get(&token).await.ok_or_else(not_logged_in)?;
        let user_id = session
            .user_id
            .ok_or_else(|| ApiError::new(ErrorType::Unauthorized).detail("This session has no user."))?;
        let user = app_state.users.get(user_id).await.ok_or_else(not_logged_in)?;

        Ok(Self(user))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/auth/status`: report the login flag the guard would see.
pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatus> {
    Json(AuthStatus { logged_in: state.logged_in(&headers).await })
}

/// `POST /api/auth/register`: create a user and log them in.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<UserProfile>), ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    tracing::info!(email = %payload.email, "registering new user");

    let user = state
        .users
        .register(NewUser {
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password: payload.password,
        })
        .await?;

    let jar = start_session(&state, jar, Some(user.id)).await;
    Ok((StatusCode::CREATED, jar, Json(user)))
}

/// `POST /api/auth/login`: check credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UserProfile>), ApiError> {
    let Json(payload) = payload.map_err(json_rejection)?;

    let user = match state.users.authenticate(&payload.email, &payload.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(email = %payload.email, "failed to log in");
            return Err(ApiError::from(e).field("email", payload.email));
        }
    };

    let jar = start_session(&state, jar, Some(user.id)).await;
    Ok((jar, Json(user)))
}

/// `GET /api/auth/me`: the logged-in user.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user)
}

/// `POST /api/auth/dev-session`: create a session without credentials, then
/// go home.
///
/// Enabled only when `DEV_AUTH_BYPASS=true`.
pub async fn dev_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    if !state.dev_auth_bypass {
        return StatusCode::NOT_FOUND.into_response();
    }

    let jar = start_session(&state, jar, None).await;
    let sessions = state.sessions.count().await;
    tracing::info!(sessions, "dev session created");

    (jar, Redirect::to(HOME_PATH)).into_response()
}

/// `POST /api/auth/logout`: delete the session, clear the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar, headers: HeaderMap) -> impl IntoResponse {
    (end_session(&state, jar, &headers).await, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
