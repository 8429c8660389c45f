// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics_store::MetricsStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<MetricsStore>,
}

pub fn app(store: Arc<MetricsStore>) -> Router {
    let state = AppState { store };
    Router::new()
        .route("/", get(http::root_handler)) // GET /
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route("/health", get(|| async { "OK" })) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
