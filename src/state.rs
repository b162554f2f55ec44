//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and middleware via the `State`
//! extractor. The auth provider is held as a trait object so the guard can
//! run against any source of login state, including test doubles.

use std::sync::Arc;

use argon2::Params;

use crate::auth::{self, AuthStateProvider};
use crate::config::Config;
use crate::services::session::SessionStore;
use crate::services::user::UserStore;

/// Clone is required by Axum; every field is Arc-backed or cheap to copy.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub users: UserStore,
    pub auth: Arc<dyn AuthStateProvider>,
    pub cookie_secure: bool,
    pub dev_auth_bypass: bool,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_password_params(config, Params::default())
    }

    /// Same as [`AppState::new`], hashing new passwords with `params`.
    #[must_use]
    pub fn with_password_params(config: &Config, params: Params) -> Self {
        let sessions = SessionStore::new(config.session_ttl);
        let auth = auth::provider_for(config.auth_provider, sessions.clone());
        Self {
            sessions,
            users: UserStore::new(params),
            auth,
            cookie_secure: config.cookie_secure,
            dev_auth_bypass: config.dev_auth_bypass,
        }
    }

    /// Login flag for a request, with provider failures treated as logged out.
    pub async fn logged_in(&self, headers: &axum::http::HeaderMap) -> bool {
        auth::logged_in_or_anonymous(self.auth.as_ref(), headers).await
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    fn fast_params() -> Params {
        Params::new(8, 1, 1, None).expect("minimal argon2 params are valid")
    }

    /// State with default config and the session cookie provider.
    pub fn test_app_state() -> AppState {
        AppState::with_password_params(&Config::default(), fast_params())
    }

    /// State with dev sessions enabled.
    pub fn dev_app_state() -> AppState {
        AppState::with_password_params(&Config { dev_auth_bypass: true, ..Config::default() }, fast_params())
    }

    /// State whose login flag comes from `auth`.
    pub fn app_state_with_auth(auth: Arc<dyn AuthStateProvider>) -> AppState {
        AppState { auth, ..test_app_state() }
    }
}
