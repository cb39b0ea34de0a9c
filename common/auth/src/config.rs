use std::fmt;

use tracing::warn;

use crate::error::{AuthError, AuthResult};

/// Shortest HS256 secret accepted without a warning (256 bits).
pub const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// Runtime configuration for token verification.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
}

impl JwtConfig {
    /// Construct config from the shared signing secret. Empty secrets are rejected.
    pub fn new(secret: impl Into<Vec<u8>>) -> AuthResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        if secret.len() < MIN_RECOMMENDED_SECRET_LEN {
            warn!(
                length = secret.len(),
                recommended = MIN_RECOMMENDED_SECRET_LEN,
                "JWT secret is shorter than recommended for HS256"
            );
        }
        Ok(Self { secret })
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}
