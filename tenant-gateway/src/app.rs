use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use common_auth::{tenant_scoped, JwtVerifier};
use tower_http::timeout::TimeoutLayer;
use tracing::error;

use crate::config::GatewayConfig;
use crate::health::{liveness, readiness, ReadinessProbe};
use crate::metrics::{http_error_metrics, GatewayMetrics};
use crate::tenant_handlers::tenant_whoami;
use crate::token_handlers::issue_dev_token;
use crate::tokens::TokenSigner;

#[derive(Clone)]
pub struct AppState {
    pub jwt_verifier: Arc<JwtVerifier>,
    pub token_signer: Option<Arc<TokenSigner>>,
    pub config: Arc<GatewayConfig>,
    pub readiness: Option<Arc<dyn ReadinessProbe>>,
    pub metrics: Arc<GatewayMetrics>,
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_verifier.clone()
    }
}

impl FromRef<AppState> for Arc<GatewayConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Tenant-scoped API, mounted at `/v1/tenants`.
///
/// The fallback sits inside the chain so unmatched tenant paths are still
/// authenticated and scoped before the 404.
fn tenant_api(verifier: Arc<JwtVerifier>) -> Router<AppState> {
    let routes = Router::new()
        .route("/:tenant_id/whoami", get(tenant_whoami))
        .fallback(not_found);
    tenant_scoped(routes, verifier)
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(liveness))
        .route("/readyz", get(readiness))
        .route("/metrics", get(metrics_endpoint))
        .nest("/v1/tenants", tenant_api(state.jwt_verifier.clone()));

    if state.token_signer.is_some() {
        router = router.route("/v1/auth/token", post(issue_dev_token));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            http_error_metrics,
        ))
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .with_state(state)
}
