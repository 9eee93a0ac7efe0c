//! Response header transformation.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers from mirrored upstream responses
//! - Strip body framing headers for local development runtimes
//! - Build the passthrough response shape (content type + cache directive)

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove headers that describe the upstream connection, not the payload.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Remove `content-encoding` and `content-length`.
///
/// Local runtimes may re-encode or re-chunk the body; stale framing headers
/// would then describe bytes that are no longer on the wire.
pub fn strip_body_framing(headers: &mut HeaderMap) {
    headers.remove(header::CONTENT_ENCODING);
    headers.remove(header::CONTENT_LENGTH);
}

/// `Cache-Control` value for a public response fresh for `max_age_secs`.
pub fn public_max_age(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("public, max-age={}", max_age_secs))
        .unwrap_or_else(|_| HeaderValue::from_static("public"))
}
