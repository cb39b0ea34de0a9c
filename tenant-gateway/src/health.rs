use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sqlx::PgPool;
use tracing::warn;

use crate::AppState;

const READINESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Dependency checked by `/readyz`.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl ReadinessProbe for PgPool {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

pub async fn liveness() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readiness(State(state): State<AppState>) -> Response {
    let Some(probe) = state.readiness.as_ref() else {
        return Json(json!({ "status": "ready" })).into_response();
    };

    let outcome = match tokio::time::timeout(READINESS_TIMEOUT, probe.ping()).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("readiness probe timed out")),
    };

    match outcome {
        Ok(()) => Json(json!({ "status": "ready" })).into_response(),
        Err(err) => {
            warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "reason": "database_unreachable" })),
            )
                .into_response()
        }
    }
}
