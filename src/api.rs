use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::metrics::Metrics;

/// Service router: liveness probe plus `/metrics` when a recorder is installed.
pub fn router(metrics: Option<&Metrics>) -> Router {
    let mut app = Router::new().route("/health", get(|| async { "ok" }));
    if let Some(m) = metrics {
        app = app.merge(m.router());
    }
    app.layer(CorsLayer::very_permissive())
}
