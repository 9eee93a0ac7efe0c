//! Two-hop font resolution: CSS lookup, then binary fetch.

use axum::http::header;
use std::sync::Arc;

use crate::config::UpstreamConfig;
use crate::error::{RelayError, RelayResult};
use crate::fonts::css::extract_font_source;
use crate::fonts::request::FontRequest;
use crate::http::request::RequestOrigin;
use crate::http::response::{strip_body_framing, strip_hop_by_hop};
use crate::observability::metrics;
use crate::upstream::{FetchRequest, FetchedResponse, Fetcher};

/// Resolves a [`FontRequest`] into the upstream font binary.
pub struct FontResolver {
    fetcher: Arc<dyn Fetcher>,
    css_endpoint: String,
    user_agent: String,
}

impl FontResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, upstream: &UpstreamConfig) -> Self {
        Self {
            fetcher,
            css_endpoint: upstream.font_css_url.clone(),
            user_agent: upstream.user_agent.clone(),
        }
    }

    /// Build the CSS API query for a request.
    ///
    /// `text` is form-encoded and appended as a glyph filter only when present.
    pub fn css_url(&self, request: &FontRequest) -> String {
        let mut url = format!(
            "{}?family={}:wght@{}",
            self.css_endpoint,
            encode(request.family()),
            encode_axis_values(request.weight())
        );
        if let Some(text) = request.text() {
            url.push_str("&text=");
            url.push_str(&encode(text));
        }
        url
    }

    /// Fetch the CSS, extract the TrueType/OpenType URL and fetch the binary.
    ///
    /// The binary response keeps the upstream status and headers. Requests
    /// from a local runtime additionally lose `content-encoding` and
    /// `content-length`.
    pub async fn resolve(
        &self,
        request: &FontRequest,
        origin: RequestOrigin,
    ) -> RelayResult<FetchedResponse> {
        let css_url = self.css_url(request);
        let css = self
            .fetcher
            .fetch(FetchRequest::get(&css_url).header(header::USER_AGENT, &self.user_agent))
            .await?;
        metrics::record_upstream_fetch("css", css.status.as_u16());
        ensure_available(&css_url, &css)?;

        let Some(source) = extract_font_source(&css.text()) else {
            tracing::info!(
                family = %request.family(),
                weight = %request.weight(),
                status = %css.status,
                "No TrueType/OpenType source in font CSS"
            );
            return Err(RelayError::AssetNotFound);
        };

        tracing::debug!(url = %source.url, format = ?source.format, "Fetching font binary");
        let mut font = self.fetcher.fetch(FetchRequest::get(&source.url)).await?;
        metrics::record_upstream_fetch("font", font.status.as_u16());
        ensure_available(&source.url, &font)?;

        strip_hop_by_hop(&mut font.headers);
        if origin.is_local() {
            strip_body_framing(&mut font.headers);
        }

        Ok(font)
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Form-encode an axis value list such as `400` or `0,400;1,700`, leaving
/// the separators the CSS API reads unescaped.
fn encode_axis_values(value: &str) -> String {
    encode(value)
        .replace("%3B", ";")
        .replace("%2C", ",")
        .replace("%40", "@")
}

fn ensure_available(url: &str, response: &FetchedResponse) -> RelayResult<()> {
    if response.status.is_server_error() {
        return Err(RelayError::upstream(
            url,
            format!("upstream returned {}", response.status),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned responses by exact URL and records every request.
    #[derive(Default)]
    struct StubFetcher {
        responses: HashMap<String, FetchedResponse>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl StubFetcher {
        fn with(mut self, url: &str, status: StatusCode, headers: &[(&'static str, &str)], body: &[u8]) -> Self {
            let mut map = HeaderMap::new();
            for (name, value) in headers {
                map.insert(*name, value.parse().unwrap());
            }
            self.responses.insert(
                url.to_string(),
                FetchedResponse {
                    status,
                    headers: map,
                    body: Bytes::copy_from_slice(body),
                },
            );
            self
        }

        fn seen_urls(&self) -> Vec<String> {
            self.seen.lock().unwrap().iter().map(|r| r.url.clone()).collect()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, request: FetchRequest) -> RelayResult<FetchedResponse> {
            let url = request.url.clone();
            self.seen.lock().unwrap().push(request);
            self.responses
                .get(&url)
                .cloned()
                .ok_or_else(|| RelayError::upstream(url, "connection refused"))
        }
    }

    const CSS_URL: &str = "https://fonts.test/css2?family=Roboto:wght@400";
    const TTF_URL: &str = "https://static.test/x.ttf";

    fn upstream() -> UpstreamConfig {
        UpstreamConfig {
            font_css_url: "https://fonts.test/css2".into(),
            ..UpstreamConfig::default()
        }
    }

    fn truetype_css() -> String {
        format!("@font-face {{ src: url({}) format('truetype'); }}", TTF_URL)
    }

    fn resolver(fetcher: Arc<StubFetcher>) -> FontResolver {
        FontResolver::new(fetcher, &upstream())
    }

    #[test]
    fn test_css_url_without_text() {
        let r = resolver(Arc::new(StubFetcher::default()));
        let req = FontRequest::new("roboto", "400", None).unwrap();
        assert_eq!(r.css_url(&req), CSS_URL);
        assert!(!r.css_url(&req).contains("text="));
    }

    #[test]
    fn test_css_url_encodes_text() {
        let r = resolver(Arc::new(StubFetcher::default()));
        let req = FontRequest::new("roboto", "700", Some("Hello World&more?")).unwrap();
        assert_eq!(
            r.css_url(&req),
            "https://fonts.test/css2?family=Roboto:wght@700&text=Hello+World%26more%3F"
        );
    }

    #[test]
    fn test_css_url_encodes_weight() {
        let r = resolver(Arc::new(StubFetcher::default()));
        let req = FontRequest::new("roboto", "400&text=x#frag", None).unwrap();
        let url = r.css_url(&req);
        assert_eq!(url, "https://fonts.test/css2?family=Roboto:wght@400%26text%3Dx%23frag");
        assert!(!url.contains("&text="));

        let req = FontRequest::new("roboto", "0,400;1,700", None).unwrap();
        assert_eq!(r.css_url(&req), "https://fonts.test/css2?family=Roboto:wght@0,400;1,700");
    }

    #[test]
    fn test_css_url_encodes_multi_word_family() {
        let r = resolver(Arc::new(StubFetcher::default()));
        let req = FontRequest::new("open sans", "400", None).unwrap();
        assert_eq!(
            r.css_url(&req),
            "https://fonts.test/css2?family=Open+sans:wght@400"
        );
    }

    #[tokio::test]
    async fn test_resolves_truetype_binary() {
        let fetcher = Arc::new(
            StubFetcher::default()
                .with(CSS_URL, StatusCode::OK, &[("content-type", "text/css")], truetype_css().as_bytes())
                .with(TTF_URL, StatusCode::OK, &[("content-type", "font/ttf")], b"\x00\x01\x00\x00glyphs"),
        );
        let r = resolver(fetcher.clone());
        let req = FontRequest::new("roboto", "400", None).unwrap();

        let font = r.resolve(&req, RequestOrigin::Remote).await.unwrap();
        assert_eq!(font.status, StatusCode::OK);
        assert_eq!(&font.body[..], b"\x00\x01\x00\x00glyphs");
        assert_eq!(font.content_type().unwrap(), "font/ttf");
        assert_eq!(fetcher.seen_urls(), vec![CSS_URL.to_string(), TTF_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_css_request_uses_legacy_user_agent() {
        let fetcher = Arc::new(
            StubFetcher::default()
                .with(CSS_URL, StatusCode::OK, &[], truetype_css().as_bytes())
                .with(TTF_URL, StatusCode::OK, &[], b"font"),
        );
        let r = resolver(fetcher.clone());
        let req = FontRequest::new("roboto", "400", None).unwrap();
        r.resolve(&req, RequestOrigin::Remote).await.unwrap();

        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(
            seen[0].headers.get(header::USER_AGENT).unwrap(),
            upstream().user_agent.as_str()
        );
        assert!(seen[1].headers.get(header::USER_AGENT).is_none());
    }

    #[tokio::test]
    async fn test_modern_only_css_is_not_found() {
        let css = "@font-face { src: url(https://static.test/x.woff2) format('woff2'); }";
        let fetcher = Arc::new(StubFetcher::default().with(CSS_URL, StatusCode::OK, &[], css.as_bytes()));
        let r = resolver(fetcher.clone());
        let req = FontRequest::new("roboto", "400", None).unwrap();

        let err = r.resolve(&req, RequestOrigin::Remote).await.unwrap_err();
        assert!(matches!(err, RelayError::AssetNotFound));
        assert_eq!(fetcher.seen_urls().len(), 1, "binary must not be fetched");
    }

    #[tokio::test]
    async fn test_css_server_error_is_upstream_unavailable() {
        let fetcher = Arc::new(StubFetcher::default().with(CSS_URL, StatusCode::BAD_GATEWAY, &[], b"oops"));
        let r = resolver(fetcher);
        let req = FontRequest::new("roboto", "400", None).unwrap();

        let err = r.resolve(&req, RequestOrigin::Remote).await.unwrap_err();
        assert!(matches!(err, RelayError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_binary_transport_failure_propagates() {
        let fetcher = Arc::new(StubFetcher::default().with(CSS_URL, StatusCode::OK, &[], truetype_css().as_bytes()));
        let r = resolver(fetcher);
        let req = FontRequest::new("roboto", "400", None).unwrap();

        let err = r.resolve(&req, RequestOrigin::Remote).await.unwrap_err();
        assert!(matches!(err, RelayError::UpstreamUnavailable { ref url, .. } if url == TTF_URL));
    }

    #[tokio::test]
    async fn test_local_origin_strips_framing_headers() {
        let headers = [
            ("content-type", "font/ttf"),
            ("content-encoding", "gzip"),
            ("content-length", "4"),
            ("transfer-encoding", "chunked"),
        ];
        let fetcher = Arc::new(
            StubFetcher::default()
                .with(CSS_URL, StatusCode::OK, &[], truetype_css().as_bytes())
                .with(TTF_URL, StatusCode::OK, &headers, b"font"),
        );
        let r = resolver(fetcher);
        let req = FontRequest::new("roboto", "400", None).unwrap();

        let local = r.resolve(&req, RequestOrigin::Local).await.unwrap();
        assert!(local.headers.get(header::CONTENT_ENCODING).is_none());
        assert!(local.headers.get(header::CONTENT_LENGTH).is_none());
        assert!(local.headers.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(local.headers.get(header::CONTENT_TYPE).unwrap(), "font/ttf");

        let remote = r.resolve(&req, RequestOrigin::Remote).await.unwrap();
        assert_eq!(remote.headers.get(header::CONTENT_ENCODING).unwrap(), "gzip");
        assert_eq!(remote.headers.get(header::CONTENT_LENGTH).unwrap(), "4");
        assert!(remote.headers.get(header::TRANSFER_ENCODING).is_none());
    }
}
