use std::sync::Arc;

use anyhow::Context;
use common_auth::{JwtConfig, JwtVerifier};
use sqlx::postgres::PgPoolOptions;
use tenant_gateway::config::load_gateway_config;
use tenant_gateway::health::ReadinessProbe;
use tenant_gateway::metrics::GatewayMetrics;
use tenant_gateway::telemetry::init_tracing;
use tenant_gateway::tokens::{TokenConfig, TokenSigner};
use tenant_gateway::{build_router, AppState};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_gateway_config()?;
    init_tracing(&config.log_level, config.log_format)?;

    let jwt_config =
        JwtConfig::new(config.jwt_secret.as_bytes()).context("Invalid JWT_SECRET")?;
    let jwt_verifier = Arc::new(JwtVerifier::new(jwt_config));

    let readiness = match config.database_url.as_deref() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(2)
                .connect_lazy(url)
                .context("Failed to parse DATABASE_URL")?;
            Some(Arc::new(pool) as Arc<dyn ReadinessProbe>)
        }
        None => {
            info!("DATABASE_URL not set; readiness reports ready without a database check");
            None
        }
    };

    let token_signer = if config.dev_token_minter {
        warn!(
            tenant_id = %config.dev_tenant_id,
            "development token minter enabled; /v1/auth/token issues tokens without verifying credentials"
        );
        Some(Arc::new(TokenSigner::new(
            config.jwt_secret.as_bytes(),
            TokenConfig {
                access_ttl_seconds: config.dev_token_ttl_seconds,
            },
        )))
    } else {
        None
    };

    let addr = config.socket_addr();
    let state = AppState {
        jwt_verifier,
        token_signer,
        config: Arc::new(config),
        readiness,
        metrics: Arc::new(GatewayMetrics::new()?),
    };
    let app = build_router(state);

    info!(%addr, "starting tenant-gateway");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("tenant-gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
