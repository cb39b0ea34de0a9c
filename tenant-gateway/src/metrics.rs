use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

const SERVICE_NAME: &str = "tenant-gateway";

#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    http_errors: IntCounterVec,
    dev_tokens_issued: IntCounterVec,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_errors = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)",
            ),
            &["service", "code", "status"],
        )?;
        registry.register(Box::new(http_errors.clone()))?;

        let dev_tokens_issued = IntCounterVec::new(
            Opts::new(
                "auth_dev_tokens_issued_total",
                "Count of tokens minted by the development token endpoint",
            ),
            &["tenant_id"],
        )?;
        registry.register(Box::new(dev_tokens_issued.clone()))?;

        Ok(Self {
            registry,
            http_errors,
            dev_tokens_issued,
        })
    }

    pub fn http_error(&self, code: &str, status: StatusCode) {
        self.http_errors
            .with_label_values(&[SERVICE_NAME, code, status.as_str()])
            .inc();
    }

    pub fn dev_token_issued(&self, tenant_id: &str) {
        self.dev_tokens_issued.with_label_values(&[tenant_id]).inc();
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}

/// Count error responses by their `X-Error-Code` header.
pub async fn http_error_metrics(
    State(metrics): State<Arc<GatewayMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if status.as_u16() >= 400 {
        let code = response
            .headers()
            .get("X-Error-Code")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown");
        metrics.http_error(code, status);
    }
    response
}
