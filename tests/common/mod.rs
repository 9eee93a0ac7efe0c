//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use asset_relay::config::{Environment, RelayConfig};
use asset_relay::error::{RelayError, RelayResult};
use asset_relay::upstream::{FetchRequest, FetchedResponse, Fetcher};
use asset_relay::{build_router, AppState};

pub const CSS_ENDPOINT: &str = "https://fonts.test/css2";
pub const FONT_URL: &str = "https://fonts.gstatic.test/x.ttf";
pub const FONT_BYTES: &[u8] = b"\x00\x01\x00\x00OS/2glyf";

pub fn truetype_css(url: &str) -> String {
    format!(
        "@font-face {{\n  font-family: 'Roboto';\n  src: url({}) format('truetype');\n}}\n",
        url
    )
}

pub fn woff2_css(url: &str) -> String {
    format!(
        "@font-face {{\n  font-family: 'Roboto';\n  src: url({}) format('woff2');\n}}\n",
        url
    )
}

/// In-memory upstream: canned responses by exact URL, every call recorded.
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, FetchedResponse>>,
    calls: Mutex<Vec<FetchRequest>>,
    delay: Mutex<Duration>,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: StatusCode, headers: &[(&'static str, &str)], body: impl Into<Bytes>) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, value.parse().unwrap());
        }
        self.responses.lock().unwrap().insert(
            url.to_string(),
            FetchedResponse {
                status,
                headers: map,
                body: body.into(),
            },
        );
    }

    /// Serve `css` for the Roboto 400 query and the font binary at `FONT_URL`.
    pub fn with_roboto(self: Arc<Self>, css: String) -> Arc<Self> {
        self.respond(&roboto_css_url(None), StatusCode::OK, &[("content-type", "text/css")], css);
        self.respond(
            FONT_URL,
            StatusCode::OK,
            &[
                ("content-type", "font/ttf"),
                ("content-length", "12"),
                ("content-encoding", "identity"),
            ],
            Bytes::from_static(FONT_BYTES),
        );
        self
    }

    /// Make every fetch take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: FetchRequest) -> RelayResult<FetchedResponse> {
        let url = request.url.clone();
        self.calls.lock().unwrap().push(request);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .ok_or_else(|| RelayError::upstream(url, "connection refused"))
    }
}

pub fn roboto_css_url(text: Option<&str>) -> String {
    let mut url = format!("{}?family=Roboto:wght@400", CSS_ENDPOINT);
    if let Some(text) = text {
        url.push_str("&text=");
        url.push_str(text);
    }
    url
}

pub fn test_config(environment: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.environment = Environment::from(environment);
    config.upstream.font_css_url = CSS_ENDPOINT.to_string();
    config.upstream.raw_content_base = "https://raw.test/luxass/assets".to_string();
    config.upstream.favicon_url = "https://image.test/emoji".to_string();
    config
}

pub fn test_app(environment: &str, fetcher: Arc<MockFetcher>) -> (Router, AppState) {
    let state = AppState::new(test_config(environment), fetcher);
    (build_router(state.clone()), state)
}

/// Send a GET through the router with the given `Host`.
pub async fn get(app: &Router, host: &str, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

/// Serve `app` on an ephemeral loopback port.
pub async fn start_upstream(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
