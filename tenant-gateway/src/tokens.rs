use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use common_auth::{encode_token, TokenClaims};

pub struct TokenConfig {
    pub access_ttl_seconds: i64,
}

/// Mints HS256 access tokens with the gateway's shared secret.
pub struct TokenSigner {
    secret: Vec<u8>,
    config: TokenConfig,
}

pub struct TokenSubject {
    pub user_id: String,
    pub tenant_id: String,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub access_expires_in: i64,
    pub token_type: &'static str,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>, config: TokenConfig) -> Self {
        Self {
            secret: secret.into(),
            config,
        }
    }

    pub fn issue_tokens(&self, subject: TokenSubject) -> Result<IssuedTokens> {
        self.issue_tokens_at(subject, Utc::now())
    }

    pub fn issue_tokens_at(&self, subject: TokenSubject, now: DateTime<Utc>) -> Result<IssuedTokens> {
        let ttl = self.config.access_ttl_seconds;
        let access_exp = Duration::try_seconds(ttl)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow!("Access token TTL out of range: {ttl}"))?;

        let claims = TokenClaims {
            sub: subject.user_id,
            tenant_id: subject.tenant_id,
            email: subject.email,
            exp: access_exp.timestamp(),
        };
        let access_token = encode_token(&claims, &self.secret)
            .map_err(|err| anyhow!("Failed to sign access token: {err}"))?;

        Ok(IssuedTokens {
            access_token,
            access_expires_at: access_exp,
            access_expires_in: ttl,
            token_type: "Bearer",
        })
    }
}
