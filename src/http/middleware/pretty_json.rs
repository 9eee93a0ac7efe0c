//! Pretty-prints JSON responses when the request asks for `?pretty`.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::RelayError;

pub async fn pretty_json(request: Request, next: Next) -> Response {
    let wants_pretty = request
        .uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).any(|(k, _)| k == "pretty"))
        .unwrap_or(false);

    let response = next.run(request).await;
    if !wants_pretty || !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return RelayError::Body(e.to_string()).into_response(),
    };

    let pretty = serde_json::from_slice::<serde_json::Value>(&bytes)
        .and_then(|value| serde_json::to_vec_pretty(&value));
    match pretty {
        Ok(pretty) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(pretty))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Response labelled JSON is not valid JSON; leaving as is");
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
