use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// One year.
const MAX_DEV_TOKEN_TTL_SECONDS: i64 = 31_536_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub request_timeout: Duration,
    pub dev_token_minter: bool,
    pub dev_tenant_id: String,
    pub dev_token_ttl_seconds: i64,
}

impl GatewayConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("request_timeout", &self.request_timeout)
            .field("dev_token_minter", &self.dev_token_minter)
            .field("dev_tenant_id", &self.dev_tenant_id)
            .field("dev_token_ttl_seconds", &self.dev_token_ttl_seconds)
            .finish()
    }
}

pub fn load_gateway_config() -> Result<GatewayConfig> {
    load_from(|key| env::var(key).ok())
}

fn load_from<F>(lookup: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("HOST")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| "0.0.0.0".to_string())
        .parse::<IpAddr>()
        .context("Failed to parse HOST")?;

    let port = parse_or("PORT", lookup("PORT"), 8080u16)?;

    // Used verbatim: trimming would change the HMAC key.
    let jwt_secret = lookup("JWT_SECRET")
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;

    let database_url = lookup("DATABASE_URL").and_then(|value| normalize_optional(&value));

    let log_level = lookup("LOG_LEVEL")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| "info".to_string());

    let log_format = lookup("LOG_FORMAT")
        .map(|value| parse_log_format(&value))
        .transpose()
        .context("Failed to parse LOG_FORMAT")?
        .unwrap_or(LogFormat::Pretty);

    let request_timeout =
        Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECONDS", lookup("REQUEST_TIMEOUT_SECONDS"), 30u64)?);

    let dev_token_minter = lookup("AUTH_DEV_TOKEN_MINTER")
        .map(|value| parse_bool(&value))
        .unwrap_or(false);

    let dev_tenant_id = lookup("AUTH_DEV_TENANT_ID")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| "mock-tenant".to_string());

    let dev_token_ttl_seconds = parse_or(
        "AUTH_DEV_TOKEN_TTL_SECONDS",
        lookup("AUTH_DEV_TOKEN_TTL_SECONDS"),
        3600i64,
    )?;
    if !(1..=MAX_DEV_TOKEN_TTL_SECONDS).contains(&dev_token_ttl_seconds) {
        return Err(anyhow!(
            "AUTH_DEV_TOKEN_TTL_SECONDS must be between 1 and {MAX_DEV_TOKEN_TTL_SECONDS}"
        ));
    }

    Ok(GatewayConfig {
        host,
        port,
        jwt_secret,
        database_url,
        log_level,
        log_format,
        request_timeout,
        dev_token_minter,
        dev_tenant_id,
        dev_token_ttl_seconds,
    })
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.and_then(|value| normalize_optional(&value)) {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}")),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" | "text" | "" => Ok(LogFormat::Pretty),
        other => Err(anyhow!(
            "Unsupported log format '{other}'. Use json or pretty."
        )),
    }
}
