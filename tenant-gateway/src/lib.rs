pub mod app;
pub mod config;
pub mod health;
pub mod metrics;
pub mod telemetry;
pub mod tenant_handlers;
pub mod token_handlers;
pub mod tokens;

pub use app::{build_router, AppState};
