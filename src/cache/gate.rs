//! Cache gate middleware for the font routes.
//!
//! # Responsibilities
//! - Select the store strategy from the environment on every request
//! - Replay hits without invoking the resolver
//! - On a successful miss, add `Cache-Control` and persist a snapshot in the
//!   background without delaying the response

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::cache::{CacheKey, CachedResponse};
use crate::error::RelayError;
use crate::http::request::request_id;
use crate::http::response::public_max_age;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn cache_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let store = state
        .caches
        .for_environment(&state.config.environment, &state.config.cache.namespace);

    if !store.persists() {
        return next.run(request).await;
    }

    let key = CacheKey::from_parts(request.uri(), request.headers());
    let req_id = request_id(request.headers()).to_string();

    if let Some(hit) = store.lookup(&key).await {
        metrics::record_cache_lookup("hit");
        tracing::debug!(request_id = %req_id, key = %key, "Cache hit");
        return hit.into_response();
    }
    metrics::record_cache_lookup("miss");
    tracing::debug!(request_id = %req_id, key = %key, "Cache miss");

    let response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return RelayError::Body(e.to_string()).into_response(),
    };

    parts.headers.insert(
        header::CACHE_CONTROL,
        public_max_age(state.config.cache.max_age_secs),
    );

    let snapshot = CachedResponse::from_parts(&parts, bytes.clone());
    state.background.spawn(async move {
        match store.store(key.clone(), snapshot).await {
            Ok(()) => {
                metrics::record_cache_store("ok");
                tracing::debug!(request_id = %req_id, key = %key, "Cached font response");
            }
            Err(e) => {
                metrics::record_cache_store("error");
                tracing::error!(request_id = %req_id, key = %key, error = %e, "Failed to cache font response");
            }
        }
    });

    Response::from_parts(parts, Body::from(bytes))
}
