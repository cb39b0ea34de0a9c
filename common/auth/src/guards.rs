use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::error_response;

const TENANTS_SEGMENT: &str = "tenants";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    MissingTenantPath,
    MissingAuthContext,
    TenantMismatch,
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::MissingTenantPath => StatusCode::BAD_REQUEST,
            GuardError::MissingAuthContext => StatusCode::UNAUTHORIZED,
            GuardError::TenantMismatch => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GuardError::MissingTenantPath => "TENANT_PATH",
            GuardError::MissingAuthContext => "AUTH_CONTEXT",
            GuardError::TenantMismatch => "TENANT_SCOPE",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GuardError::MissingTenantPath => "missing tenantId path parameter",
            GuardError::MissingAuthContext => "missing auth context",
            GuardError::TenantMismatch => "tenant scope mismatch",
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.message())
    }
}

/// Tenant id from the first `tenants/{id}` segment pair in `path`.
///
/// Returns `None` when no `tenants` segment is followed by a non-empty one.
pub fn tenant_id_from_path(path: &str) -> Option<&str> {
    let mut segments = path.trim_matches('/').split('/');
    while let Some(segment) = segments.next() {
        if segment == TENANTS_SEGMENT {
            return segments.next().filter(|tenant| !tenant.is_empty());
        }
    }
    None
}
