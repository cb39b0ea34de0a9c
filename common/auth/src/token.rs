//! Compact `header.payload.signature` wire format.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::claims::TokenClaims;
use crate::error::{AuthError, AuthResult};
use crate::signer::sign;

const HS256_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// The three segments of a compact token, still encoded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segments<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> Segments<'a> {
    /// Split on `.`; exactly three non-empty segments are required.
    pub(crate) fn split(token: &'a str) -> AuthResult<Self> {
        let mut parts = token.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature), None)
                if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
            {
                Ok(Self {
                    header,
                    payload,
                    signature,
                })
            }
            _ => Err(AuthError::MalformedToken(
                "expected three non-empty segments".to_string(),
            )),
        }
    }

    /// The `header.payload` prefix the signature covers.
    pub(crate) fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }

    pub(crate) fn decode_payload(&self) -> AuthResult<Vec<u8>> {
        URL_SAFE_NO_PAD
            .decode(self.payload)
            .map_err(|err| AuthError::MalformedToken(format!("payload encoding: {err}")))
    }
}

/// Encode and sign `claims` as an HS256 compact token.
pub fn encode_token(claims: &TokenClaims, secret: &[u8]) -> Result<String, serde_json::Error> {
    let header = URL_SAFE_NO_PAD.encode(HS256_HEADER);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
    let unsigned = format!("{header}.{payload}");
    let signature = sign(&unsigned, secret);
    Ok(format!("{unsigned}.{signature}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_requires_three_segments() {
        for token in ["", "a", "a.b", "a.b.c.d", "..", "a..c", ".b.c", "a.b."] {
            let err = Segments::split(token).expect_err(token);
            assert!(matches!(err, AuthError::MalformedToken(_)), "{token}");
        }

        let segments = Segments::split("a.b.c").expect("three segments");
        assert_eq!(segments.header, "a");
        assert_eq!(segments.payload, "b");
        assert_eq!(segments.signature, "c");
        assert_eq!(segments.signing_input(), "a.b");
    }

    #[test]
    fn encoded_token_has_unpadded_segments() {
        let claims = TokenClaims {
            sub: "alice".into(),
            tenant_id: "t1".into(),
            ..Default::default()
        };
        let token = encode_token(&claims, b"secret").expect("encode");
        let segments = Segments::split(&token).expect("split");
        assert!(!token.contains('='));

        let payload: serde_json::Value =
            serde_json::from_slice(&segments.decode_payload().expect("decode")).expect("json");
        assert_eq!(payload["sub"], "alice");
        assert_eq!(payload["tenant_id"], "t1");
        assert!(payload.get("exp").is_none());
        assert!(payload.get("email").is_none());
    }

    #[test]
    fn invalid_or_padded_payload_is_rejected() {
        let segments = Segments::split("a.e30!.c").expect("split");
        assert!(segments.decode_payload().is_err());
        let segments = Segments::split("a.e30=.c").expect("split");
        assert!(segments.decode_payload().is_err());
    }
}
