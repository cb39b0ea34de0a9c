use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AuthError, AuthResult};

/// Verified identity carried by a bearer token.
///
/// Only the verifier constructs these, after the signature check and the
/// required-claim checks have passed. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    subject: String,
    tenant_id: String,
    email: Option<String>,
    expires_at: Option<i64>,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Expiry in Unix seconds. `None` means the token never expires.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Decode the payload JSON and enforce the required claims.
    pub(crate) fn from_payload(payload: &[u8]) -> AuthResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|err| AuthError::MalformedToken(err.to_string()))?;
        if !value.is_object() {
            return Err(AuthError::MalformedToken(
                "payload is not a JSON object".to_string(),
            ));
        }
        let repr: TokenClaims = serde_json::from_value(value)
            .map_err(|err| AuthError::MalformedToken(err.to_string()))?;
        Claims::from_wire(repr)
    }

    /// Enforce the required claims on the wire form.
    pub(crate) fn from_wire(value: TokenClaims) -> AuthResult<Self> {
        if value.sub.is_empty() || value.tenant_id.is_empty() {
            return Err(AuthError::MissingClaims);
        }

        Ok(Self {
            subject: value.sub,
            tenant_id: value.tenant_id,
            email: value.email.filter(|email| !email.is_empty()),
            expires_at: (value.exp != 0).then_some(value.exp),
        })
    }
}

/// Wire form of the token payload.
///
/// Absent and `null` claims both read as their zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unix seconds; zero or absent means no expiry.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub exp: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
