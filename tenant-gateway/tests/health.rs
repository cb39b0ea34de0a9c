mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use support::{body_json, get, test_app, FakeProbe};
use tenant_gateway::health::ReadinessProbe;
use tower::ServiceExt;

#[tokio::test]
async fn liveness_is_always_ok() {
    let probe = Arc::new(FakeProbe::default());
    probe.down.store(true, Ordering::SeqCst);
    let app = test_app(false, Some(probe as Arc<dyn ReadinessProbe>));

    let response = app
        .router
        .oneshot(get("/healthz", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn readiness_reflects_database_probe() {
    let probe = Arc::new(FakeProbe::default());
    let app = test_app(false, Some(probe.clone() as Arc<dyn ReadinessProbe>));

    let response = app
        .router
        .clone()
        .oneshot(get("/readyz", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ready" }));

    probe.down.store(true, Ordering::SeqCst);
    let response = app
        .router
        .oneshot(get("/readyz", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "not_ready", "reason": "database_unreachable" })
    );
}

#[tokio::test]
async fn readiness_without_database_is_ready() {
    let app = test_app(false, None);

    let response = app
        .router
        .oneshot(get("/readyz", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}
