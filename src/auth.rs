//! Authentication state providers.
//!
//! DESIGN
//! ======
//! The route guard only needs a yes/no "logged in" signal. Providers turn
//! request headers into that signal. A provider error means the state is
//! unknown; callers treat unknown as logged out (see `logged_in_or_anonymous`).

use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::services::session::{self, SessionStore};

/// Cookie carrying the session token.
pub const COOKIE_NAME: &str = "session_token";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("session cookie is malformed")]
    MalformedToken,
}

/// Which provider the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProviderKind {
    /// Session cookie checked against the in-memory store.
    Session,
    /// Everyone is logged out.
    Anonymous,
}

/// Source of the "logged in" flag for a request.
#[async_trait::async_trait]
pub trait AuthStateProvider: Send + Sync {
    /// Report whether the request belongs to a logged-in session.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the state cannot be determined.
    async fn logged_in(&self, headers: &HeaderMap) -> Result<bool, AuthError>;
}

/// Read the session token from the request cookies. Empty values count as absent.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Session-cookie provider backed by a [`SessionStore`].
pub struct SessionCookieAuth {
    store: SessionStore,
}

impl SessionCookieAuth {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl AuthStateProvider for SessionCookieAuth {
    async fn logged_in(&self, headers: &HeaderMap) -> Result<bool, AuthError> {
        let Some(token) = session_token(headers) else {
            return Ok(false);
        };
        if !session::is_well_formed(&token) {
            return Err(AuthError::MalformedToken);
        }
        Ok(self.store.contains(&token).await)
    }
}

/// Provider that reports every request as logged out.
pub struct AnonymousAuth;

#[async_trait::async_trait]
impl AuthStateProvider for AnonymousAuth {
    async fn logged_in(&self, _headers: &HeaderMap) -> Result<bool, AuthError> {
        Ok(false)
    }
}

/// Build the provider selected by `kind`.
#[must_use]
pub fn provider_for(kind: AuthProviderKind, store: SessionStore) -> Arc<dyn AuthStateProvider> {
    match kind {
        AuthProviderKind::Session => Arc::new(SessionCookieAuth::new(store)),
        AuthProviderKind::Anonymous => Arc::new(AnonymousAuth),
    }
}

/// Ask `provider` for the login flag, treating an unknown state as logged out.
pub async fn logged_in_or_anonymous(provider: &dyn AuthStateProvider, headers: &HeaderMap) -> bool {
    match provider.logged_in(headers).await {
        Ok(logged_in) => logged_in,
        Err(e) => {
            tracing::warn!(error = %e, "auth state unavailable, treating request as logged out");
            false
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
