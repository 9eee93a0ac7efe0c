use axum::{
    extract::{Path, State},
    http::{HeaderMap, Uri},
    response::{IntoResponse, Response},
};

use crate::error::RelayResult;
use crate::fonts::FontRequest;
use crate::http::request::{request_host, request_id, RequestOrigin};
use crate::http::server::AppState;

/// `GET /api/font/{family}/{weight}`
pub async fn font(
    State(state): State<AppState>,
    Path((family, weight)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> RelayResult<Response> {
    serve_font(&state, &headers, &uri, FontRequest::new(&family, &weight, None)?).await
}

/// `GET /api/font/{family}/{weight}/{text}`
pub async fn font_with_text(
    State(state): State<AppState>,
    Path((family, weight, text)): Path<(String, String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> RelayResult<Response> {
    serve_font(&state, &headers, &uri, FontRequest::new(&family, &weight, Some(&text))?).await
}

async fn serve_font(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
    request: FontRequest,
) -> RelayResult<Response> {
    let origin = RequestOrigin::from_host(request_host(headers, uri), &state.config.listener.local_hosts);

    tracing::debug!(
        request_id = %request_id(headers),
        family = %request.family(),
        weight = %request.weight(),
        text = ?request.text(),
        origin = ?origin,
        "Resolving font"
    );

    let font = state.resolver.resolve(&request, origin).await?;
    Ok(font.into_response())
}
