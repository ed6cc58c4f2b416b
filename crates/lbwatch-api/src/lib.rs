//! lbwatch-api — HTTP exposition of the gauge registry.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | 308 redirect to `/metrics` |
//! | GET | `/metrics` | Prometheus exposition |
//!
//! Handlers read the registry on every request and never wait on the
//! refresh worker.

pub mod handlers;
pub mod server;

use axum::Router;
use axum::routing::get;
use lbwatch_metrics::Registry;

pub use server::ServerHandle;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Registry,
}

/// Build the exposition router.
pub fn build_router(registry: Registry) -> Router {
    Router::new()
        .route("/", get(handlers::root_redirect))
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(ApiState { registry })
}
