//! Route handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect};
use tracing::debug;

use lbwatch_metrics::prometheus::CONTENT_TYPE;
use lbwatch_metrics::render_prometheus;

use crate::ApiState;

/// GET /
pub async fn root_redirect() -> Redirect {
    Redirect::permanent("/metrics")
}

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let families = state.registry.snapshot().await;
    let body = render_prometheus(&families);
    debug!(families = families.len(), bytes = body.len(), "metrics scraped");

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}
