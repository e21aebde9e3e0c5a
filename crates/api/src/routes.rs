use crate::handlers;
use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

/// Route table, in priority order: control API, index page, then the
/// fallback that handles probes, redirects and static files.
pub fn create_portal_routes(state: AppState) -> Router {
    Router::new()
        .route("/scan", get(handlers::scan_networks))
        .route("/connect", post(handlers::connect_station))
        .route("/status", get(handlers::get_status))
        .route("/", get(handlers::serve_index))
        .route("/index.html", get(handlers::serve_index))
        .fallback(handlers::serve_portal)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}
