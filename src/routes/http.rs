// GET handlers: metrics, root, version

use axum::{extract::State, http::header, response::IntoResponse};

use super::AppState;

/// Package name and version (from Cargo.toml at build time).
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics — latest value of every gauge, in text exposition format.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.store.render(),
    )
}

pub(super) async fn root_handler() -> impl IntoResponse {
    format!("{} {}: metrics at /metrics", NAME, VERSION)
}

/// GET /version — returns service name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
