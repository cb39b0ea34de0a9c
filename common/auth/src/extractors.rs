use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request};
use axum::http::{request::Parts, Extensions};

use crate::claims::Claims;
use crate::guards::GuardError;

/// Request extension holding the verified identity.
///
/// Private so nothing outside this module can insert or overwrite it.
#[derive(Clone)]
struct IdentityBinding(Arc<Claims>);

/// Attach verified claims to a request, returning the request that carries them.
pub fn attach(mut request: Request, claims: Claims) -> Request {
    request
        .extensions_mut()
        .insert(IdentityBinding(Arc::new(claims)));
    request
}

/// Look up the identity attached by [`attach`], if any.
pub fn retrieve(extensions: &Extensions) -> Option<&Claims> {
    extensions
        .get::<IdentityBinding>()
        .map(|binding| binding.0.as_ref())
}

/// Verified identity for handlers behind the authentication middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: Arc<Claims>,
}

impl AuthContext {
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn subject(&self) -> &str {
        self.claims.subject()
    }

    pub fn tenant_id(&self) -> &str {
        self.claims.tenant_id()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityBinding>()
            .map(|binding| AuthContext {
                claims: binding.0.clone(),
            })
            .ok_or(GuardError::MissingAuthContext)
    }
}
