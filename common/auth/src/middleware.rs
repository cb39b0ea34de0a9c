//! Authentication and tenant-scope middleware.
//!
//! Protected routes run `authenticate` first, then `tenant_scope`, then the
//! handler. Use [`tenant_scoped`] to apply both in that order.

use std::sync::Arc;

use axum::extract::{OriginalUri, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use percent_encoding::percent_decode_str;
use tracing::warn;

use crate::error::{AuthError, AuthResult};
use crate::extractors::{attach, retrieve};
use crate::guards::{tenant_id_from_path, GuardError};
use crate::verifier::JwtVerifier;

/// Wrap every route of `router` in authentication and then tenant scope.
///
/// Routes and fallback must be registered on `router` before calling this.
pub fn tenant_scoped<S>(router: Router<S>, verifier: Arc<JwtVerifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(middleware::from_fn(tenant_scope))
        .layer(middleware::from_fn_with_state(verifier, authenticate))
}

/// Verify the bearer token and attach its claims before calling `next`.
pub async fn authenticate(
    State(verifier): State<Arc<JwtVerifier>>,
    request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(err) => {
            warn!(error = %err, "rejected request authorization header");
            return err.into_response();
        }
    };

    let claims = match verifier.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            warn!(error = %err, "auth failed");
            return err.into_response();
        }
    };

    next.run(attach(request, claims)).await
}

/// Require the path tenant to match the authenticated tenant.
pub async fn tenant_scope(request: Request, next: Next) -> Response {
    if let Err(err) = check_tenant_scope(&request) {
        return err.into_response();
    }
    next.run(request).await
}

fn check_tenant_scope(request: &Request) -> Result<(), GuardError> {
    // Nested routers see a stripped URI; the tenant lives in the original one.
    let raw_path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.path())
        .unwrap_or_else(|| request.uri().path());
    let path = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| GuardError::MissingTenantPath)?;

    let tenant_id = tenant_id_from_path(&path).ok_or(GuardError::MissingTenantPath)?;
    let claims = retrieve(request.extensions()).ok_or_else(|| {
        warn!("tenant scope evaluated without auth context");
        GuardError::MissingAuthContext
    })?;

    if claims.tenant_id() != tenant_id {
        warn!(requested_tenant = %tenant_id, "tenant scope mismatch");
        return Err(GuardError::TenantMismatch);
    }
    Ok(())
}

fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?;
    if value.is_empty() {
        return Err(AuthError::MissingAuthorization);
    }

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => Ok(token),
        _ => Err(AuthError::InvalidAuthorization),
    }
}
