#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use common_auth::{encode_token, JwtConfig, JwtVerifier, TokenClaims};
use http_body_util::BodyExt;
use serde_json::Value;
use tenant_gateway::config::{GatewayConfig, LogFormat};
use tenant_gateway::health::ReadinessProbe;
use tenant_gateway::metrics::GatewayMetrics;
use tenant_gateway::tokens::{TokenConfig, TokenSigner};
use tenant_gateway::{build_router, AppState};

pub const TEST_SECRET: &str = "tenant-gateway-test-secret-0123456789";

pub fn test_config(dev_token_minter: bool) -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".parse().expect("host"),
        port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        database_url: None,
        log_level: "debug".to_string(),
        log_format: LogFormat::Pretty,
        request_timeout: Duration::from_secs(5),
        dev_token_minter,
        dev_tenant_id: "mock-tenant".to_string(),
        dev_token_ttl_seconds: 3600,
    }
}

/// Readiness probe whose health is toggled by the test.
#[derive(Default)]
pub struct FakeProbe {
    pub down: AtomicBool,
}

#[async_trait]
impl ReadinessProbe for FakeProbe {
    async fn ping(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(anyhow!("connection refused"))
        } else {
            Ok(())
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_app(dev_token_minter: bool, readiness: Option<Arc<dyn ReadinessProbe>>) -> TestApp {
    let config = test_config(dev_token_minter);
    let verifier = JwtVerifier::new(JwtConfig::new(TEST_SECRET).expect("jwt config"));
    let token_signer = dev_token_minter.then(|| {
        Arc::new(TokenSigner::new(
            TEST_SECRET,
            TokenConfig {
                access_ttl_seconds: config.dev_token_ttl_seconds,
            },
        ))
    });

    let state = AppState {
        jwt_verifier: Arc::new(verifier),
        token_signer,
        config: Arc::new(config),
        readiness,
        metrics: Arc::new(GatewayMetrics::new().expect("metrics")),
    };

    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

pub fn token_for(subject: &str, tenant: &str) -> String {
    let claims = TokenClaims {
        sub: subject.to_string(),
        tenant_id: tenant.to_string(),
        email: None,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode_token(&claims, TEST_SECRET.as_bytes()).expect("token")
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
