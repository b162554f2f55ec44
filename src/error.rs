//! API errors rendered as RFC 9457 problem details.
//!
//! Every API failure is an [`ErrorType`] plus optional detail and extra
//! members, serialized as `application/problem+json`.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::services::user::UserError;

const ERROR_URI: &str = "tag:domus-web,2024:errors/";

pub const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorType {
    #[error("An unknown error has occurred.")]
    Unknown,
    #[error("Your request is not valid.")]
    ValidationError,
    #[error("A user with that email already exists.")]
    UserAlreadyExists,
    #[error("Login Incorrect.")]
    LoginIncorrect,
    #[error("You have not been authorized to perform this action.")]
    Unauthorized,
}

impl ErrorType {
    /// Problem type URI. Unknown errors use `about:blank`.
    #[must_use]
    pub fn type_uri(self) -> String {
        let slug = match self {
            Self::Unknown => return "about:blank".to_owned(),
            Self::ValidationError => "validation-error",
            Self::UserAlreadyExists => "user-already-exists",
            Self::LoginIncorrect => "login-incorrect",
            Self::Unauthorized => "unauthorized",
        };
        format!("{ERROR_URI}{slug}")
    }

    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::LoginIncorrect | Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn default_detail(self) -> Option<&'static str> {
        match self {
            Self::LoginIncorrect => {
                Some("The email or password you entered is incorrect. Please check your credentials and try again.")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    status: u16,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ApiError {
    #[must_use]
    pub fn new(kind: ErrorType) -> Self {
        Self {
            error_type: kind.type_uri(),
            status: kind.status().as_u16(),
            title: kind.to_string(),
            detail: kind.default_detail().map(str::to_owned),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add an extension member.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_owned(), value.into());
        self
    }

    /// Text for a human: the detail if present, else the title.
    #[must_use]
    pub fn message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.title)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ErrorType> for ApiError {
    fn from(kind: ErrorType) -> Self {
        Self::new(kind)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Invalid(reason) => Self::new(ErrorType::ValidationError).detail(reason),
            UserError::AlreadyExists(email) => Self::new(ErrorType::UserAlreadyExists).field("email", email),
            UserError::LoginIncorrect => Self::new(ErrorType::LoginIncorrect),
            UserError::Hash(e) => {
                tracing::error!(error = %e, "password hashing failed");
                Self::new(ErrorType::Unknown)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_owned());
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], body).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
