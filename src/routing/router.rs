//! Route table.
//!
//! # Responsibilities
//! - Mount the font routes behind the cache gate
//! - Mount the passthrough routes alongside them
//! - Answer everything else with a fixed 404
//!
//! # Design Decisions
//! - Static routes win over the `/{*path}` catch-all (matchit precedence)
//! - The cache gate is a route layer, so it only sees font requests

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::cache::cache_gate;
use crate::fonts::handlers::{font, font_with_text};
use crate::http::server::AppState;
use crate::proxy::{content, favicon, view_source};

/// Body returned for unrouted requests.
pub const UNROUTED_BODY: &str = "404 Not Found";

/// Font routes, wrapped by the cache gate.
pub fn font_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/font/{family}/{weight}", get(font))
        .route("/api/font/{family}/{weight}/{text}", get(font_with_text))
        .route_layer(middleware::from_fn_with_state(state, cache_gate))
}

/// Raw file passthrough, favicon and the source redirect.
pub fn passthrough_routes() -> Router<AppState> {
    Router::new()
        .route("/favicon.ico", get(favicon))
        .route("/view-source", get(view_source))
        .route("/", get(content))
        .route("/{*path}", get(content))
}

/// Complete route table with state applied.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(font_routes(state.clone()))
        .merge(passthrough_routes())
        .fallback(unrouted)
        .method_not_allowed_fallback(unrouted)
        .with_state(state)
}

async fn unrouted() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, UNROUTED_BODY)
}
