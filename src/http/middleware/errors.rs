//! Centralized failure presentation.
//!
//! Every 500 produced anywhere in the stack carries an [`ErrorDetail`]. This
//! layer logs it once and decides whether the client sees it: production
//! keeps the generic body, every other environment gets the detail.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ErrorDetail;
use crate::http::request::request_id;
use crate::http::server::AppState;

pub async fn present_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let req_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };

    tracing::error!(
        request_id = %req_id,
        method = %method,
        path = %path,
        status = %response.status(),
        error = %detail,
        "Request failed"
    );

    if state.config.environment.is_production() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(detail))
}
