//! Raw file, favicon and view-source routes.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::error::{RelayError, RelayResult};
use crate::http::response::public_max_age;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{FetchRequest, FetchedResponse};

/// `GET /` and `GET /{*path}`: serve a file from the asset repository.
pub async fn content(State(state): State<AppState>, uri: Uri) -> RelayResult<Response> {
    let upstream = &state.config.upstream;
    let url = raw_content_url(
        &upstream.raw_content_base,
        &upstream.default_branch,
        uri.path(),
        uri.query(),
    )?;

    let mut request = FetchRequest::get(&url);
    if let Some(token) = &upstream.github_token {
        request = request.header(header::AUTHORIZATION, &format!("token {}", token));
    }

    let fetched = state.fetcher.fetch(request).await?;
    metrics::record_upstream_fetch("content", fetched.status.as_u16());
    Ok(passthrough(fetched, state.config.cache.max_age_secs))
}

/// `GET /favicon.ico`
pub async fn favicon(State(state): State<AppState>) -> RelayResult<Response> {
    let fetched = state
        .fetcher
        .fetch(FetchRequest::get(&state.config.upstream.favicon_url))
        .await?;
    metrics::record_upstream_fetch("favicon", fetched.status.as_u16());
    Ok(passthrough(fetched, state.config.cache.max_age_secs))
}

/// `GET /view-source`
pub async fn view_source(State(state): State<AppState>) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.config.upstream.source_url.clone())],
    )
        .into_response()
}

/// Build `{base}/{branch}{path}` for a request path.
///
/// `/` maps to `/README.md`; `branch` comes from the query or the default.
/// `..` segments in either part are refused so a request cannot leave the
/// repository.
pub fn raw_content_url(
    base: &str,
    default_branch: &str,
    path: &str,
    query: Option<&str>,
) -> RelayResult<String> {
    let path = if path == "/" || path.is_empty() { "/README.md" } else { path };

    let branch = query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(k, _)| k == "branch")
                .map(|(_, v)| v.into_owned())
        })
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| default_branch.to_string());

    if has_parent_segment(&branch) || has_parent_segment(path) {
        return Err(RelayError::InvalidRequest(
            "path segments must not contain '..'".into(),
        ));
    }

    Ok(format!("{}/{}{}", base.trim_end_matches('/'), branch.trim_matches('/'), path))
}

fn has_parent_segment(value: &str) -> bool {
    value
        .split('/')
        .any(|segment| segment == ".." || segment.eq_ignore_ascii_case("%2e%2e"))
}

/// Mirror status and content type; advertise public caching.
fn passthrough(fetched: FetchedResponse, max_age_secs: u64) -> Response {
    let FetchedResponse {
        status,
        mut headers,
        body,
    } = fetched;

    let mut response = (status, body).into_response();
    if let Some(content_type) = headers.remove(header::CONTENT_TYPE) {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, public_max_age(max_age_secs));
    response
}
