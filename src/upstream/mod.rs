//! Outbound HTTP capability.
//!
//! # Data Flow
//! ```text
//! FetchRequest (url, headers)
//!     → Fetcher::fetch (client.rs: reqwest; tests: in-memory mocks)
//!     → FetchedResponse (status, headers, fully buffered body)
//! ```
//!
//! # Design Decisions
//! - Bodies are read fully into memory; font files are small and the cache
//!   needs the bytes anyway
//! - No retries; a failed call fails the request
//! - The trait is the seam tests substitute to count upstream calls

pub mod client;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::RelayResult;

pub use client::ReqwestFetcher;

/// Outbound GET request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: HeaderMap,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Attach a header. Values that are not valid header text are skipped.
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => {
                tracing::warn!(header = %name, "Dropping invalid outbound header value");
            }
        }
        self
    }
}

/// Fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchedResponse {
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.headers.get(header::CONTENT_TYPE)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for FetchedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// HTTP client capability used by every handler that talks to an upstream.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> RelayResult<FetchedResponse>;
}
