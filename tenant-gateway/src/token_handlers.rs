//! Development-only token endpoint.
//!
//! Mints a token for whatever username is supplied without checking any
//! credential. It stands in for a real identity provider and is only routed
//! when `AUTH_DEV_TOKEN_MINTER` is enabled.

use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::tokens::TokenSubject;
use crate::AppState;

const DEFAULT_SUBJECT: &str = "mock-user";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: &'static str,
}

#[derive(Debug)]
pub struct TokenError {
    status: StatusCode,
    body: ErrorResponse,
}

impl TokenError {
    fn new(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            status,
            body: ErrorResponse { code, message },
        }
    }

    fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
    }

    fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SERVER_ERROR",
            "failed to issue token",
        )
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let code = self.body.code;
        let mut response = (self.status, Json(self.body)).into_response();
        response
            .headers_mut()
            .insert("X-Error-Code", axum::http::HeaderValue::from_static(code));
        response
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// `POST /v1/auth/token` accepting JSON or form-encoded bodies.
pub async fn issue_dev_token(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<TokenResponse>, TokenError> {
    let token_request = parse_token_request(request, &state).await?;
    if token_request.grant_type.trim().is_empty() {
        return Err(TokenError::bad_request("grant_type is required"));
    }

    let signer = state
        .token_signer
        .as_ref()
        .ok_or_else(TokenError::internal_error)?;

    let user_id = match token_request.username.trim() {
        "" => DEFAULT_SUBJECT.to_string(),
        username => username.to_string(),
    };
    let tenant_id = state.config.dev_tenant_id.clone();

    let issued = signer
        .issue_tokens(TokenSubject {
            user_id,
            tenant_id: tenant_id.clone(),
            email: None,
        })
        .map_err(|err| {
            error!(error = %err, "failed to mint development token");
            TokenError::internal_error()
        })?;

    state.metrics.dev_token_issued(&tenant_id);
    info!(tenant_id = %tenant_id, "issued development token");

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.access_expires_in,
    }))
}

async fn parse_token_request(request: Request, state: &AppState) -> Result<TokenRequest, TokenError> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        let Json(body) = Json::<TokenRequest>::from_request(request, state)
            .await
            .map_err(|_| TokenError::bad_request("invalid json body"))?;
        Ok(body)
    } else {
        let Form(body) = Form::<TokenRequest>::from_request(request, state)
            .await
            .map_err(|_| TokenError::bad_request("invalid form body"))?;
        Ok(body)
    }
}
