use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

pub(crate) const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token missing required claims")]
    MissingClaims,
    #[error("token expired")]
    TokenExpired,
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("signing secret must not be empty")]
    EmptySecret,
}

impl AuthError {
    /// Message returned to the caller. Token failures share one message so the
    /// response never tells a client which check rejected it.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "missing authorization header",
            AuthError::InvalidAuthorization => "invalid authorization header",
            AuthError::MalformedToken(_)
            | AuthError::InvalidSignature
            | AuthError::MissingClaims
            | AuthError::TokenExpired
            | AuthError::EmptySecret => "invalid token",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => "AUTH_HEADER",
            _ => "AUTH_TOKEN",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

pub(crate) fn error_response(
    status: StatusCode,
    code: &'static str,
    message: &'static str,
) -> Response {
    let mut response = (status, Json(ErrorBody { code, message })).into_response();
    response
        .headers_mut()
        .insert(ERROR_CODE_HEADER, HeaderValue::from_static(code));
    response
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, self.code(), self.public_message())
    }
}
