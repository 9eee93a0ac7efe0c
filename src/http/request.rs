//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Extract the effective host of a request
//! - Classify the request origin (local development runtime or deployed)

use axum::http::{header, HeaderMap, HeaderName, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Read the request ID set by the request-ID layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Effective host of a request: the `Host` header, else the URI authority.
pub fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
}

/// Where a request is being served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// A local development runtime that may re-encode response bodies.
    Local,
    Remote,
}

impl RequestOrigin {
    /// Classify a host (with or without port) against the configured local hosts.
    pub fn from_host(host: Option<&str>, local_hosts: &[String]) -> Self {
        let Some(host) = host else {
            return RequestOrigin::Remote;
        };
        let name = strip_port(host.trim());
        if local_hosts.iter().any(|h| h.eq_ignore_ascii_case(name)) {
            RequestOrigin::Local
        } else {
            RequestOrigin::Remote
        }
    }

    pub fn is_local(self) -> bool {
        self == RequestOrigin::Local
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal: keep the brackets, drop ":port".
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListenerConfig;

    fn local_hosts() -> Vec<String> {
        ListenerConfig::default().local_hosts
    }

    #[test]
    fn test_local_hosts_with_ports() {
        let hosts = local_hosts();
        for host in ["localhost", "localhost:8787", "LOCALHOST:3000", "127.0.0.1:8080", "[::1]:8787"] {
            assert_eq!(
                RequestOrigin::from_host(Some(host), &hosts),
                RequestOrigin::Local,
                "{} should be local",
                host
            );
        }
    }

    #[test]
    fn test_remote_hosts() {
        let hosts = local_hosts();
        for host in ["assets.luxass.dev", "assets.luxass.dev:443", "localhost.example.com"] {
            assert_eq!(RequestOrigin::from_host(Some(host), &hosts), RequestOrigin::Remote);
        }
        assert_eq!(RequestOrigin::from_host(None, &hosts), RequestOrigin::Remote);
    }

    #[test]
    fn test_request_host_prefers_header() {
        let mut headers = HeaderMap::new();
        let uri: Uri = "http://authority.test/api".parse().unwrap();
        assert_eq!(request_host(&headers, &uri), Some("authority.test"));

        headers.insert(header::HOST, "header.test".parse().unwrap());
        assert_eq!(request_host(&headers, &uri), Some("header.test"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut make = MakeRequestUuid;
        let req = Request::new(());
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
