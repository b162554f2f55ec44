//! Route guard: decides whether a navigation proceeds or redirects.
//!
//! DESIGN
//! ======
//! `evaluate` is a pure function of the destination path and the login
//! flag. The flag is supplied by the caller (see `crate::auth`); nothing in
//! this module reads sessions, cookies, or globals.
//!
//! The login page is matched by exact path equality. `/login/`, `/LOGIN`
//! and the empty string are ordinary paths.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Path logged-in users land on when they visit the login page.
pub const HOME_PATH: &str = "/";

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested page.
    Allow,
    /// Send the client elsewhere instead.
    Redirect(GuardRedirect),
}

/// Where to send a navigation the guard refused, and with which status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardRedirect {
    pub location: &'static str,
    pub status: StatusCode,
}

impl Decision {
    const fn redirect(location: &'static str) -> Self {
        Self::Redirect(GuardRedirect { location, status: StatusCode::FOUND })
    }
}

/// Evaluate the guard for a navigation to `target_path`.
#[must_use]
pub fn evaluate(target_path: &str, is_logged_in: bool) -> Decision {
    let on_login_page = target_path == LOGIN_PATH;

    match (is_logged_in, on_login_page) {
        (true, true) => Decision::redirect(HOME_PATH),
        (true, false) | (false, true) => Decision::Allow,
        (false, false) => Decision::redirect(LOGIN_PATH),
    }
}

impl IntoResponse for GuardRedirect {
    fn into_response(self) -> Response {
        (self.status, [(header::LOCATION, self.location)]).into_response()
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
