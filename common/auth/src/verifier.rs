use chrono::Utc;
use tracing::debug;

use crate::claims::Claims;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::signer::{sign, verify_signature};
use crate::token::Segments;

/// Verifies HS256 compact tokens against a shared secret.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify as of `now` (Unix seconds).
    ///
    /// The signature is checked before the payload is decoded.
    pub fn verify_at(&self, token: &str, now: i64) -> AuthResult<Claims> {
        let segments = Segments::split(token)?;

        let expected = sign(&segments.signing_input(), self.config.secret());
        if !verify_signature(segments.signature, &expected) {
            return Err(AuthError::InvalidSignature);
        }

        let payload = segments.decode_payload()?;
        let claims = Claims::from_payload(&payload)?;

        if let Some(expires_at) = claims.expires_at() {
            if now > expires_at {
                return Err(AuthError::TokenExpired);
            }
        }

        debug!("verified JWT successfully");
        Ok(claims)
    }
}
