//! Font response caching subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound font request
//!     → gate.rs (select store for the environment, compute CacheKey)
//!     → CacheStore::lookup
//!         hit  → replay CachedResponse, resolver never runs
//!         miss → resolver runs → on success add Cache-Control
//!                → BackgroundTasks: CacheStore::store (detached)
//! ```
//!
//! # Design Decisions
//! - Two store strategies behind one trait: `NullCache` (always miss, never
//!   persists) and `MemoryCache`; the gate's control flow is the same for both
//! - Freshness is carried by the entry's `Cache-Control` header and enforced
//!   by the store, not by the gate
//! - Concurrent misses for one key may both resolve; the last store wins

pub mod gate;
pub mod memory;
pub mod null;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{response::Parts, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{CacheConfig, Environment};
use crate::http::request::request_host;

pub use gate::cache_gate;
pub use memory::MemoryCache;
pub use null::NullCache;

/// Cache address: the normalized absolute URL of the inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key from the request target and its `Host`.
    ///
    /// Only the URL participates; other headers and the client identity do not.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        let scheme = uri.scheme_str().unwrap_or("http");
        let host = request_host(headers, uri).unwrap_or("localhost");
        let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
        let raw = format!("{}://{}{}", scheme, host, target);

        match url::Url::parse(&raw) {
            Ok(url) => Self(url.into()),
            Err(_) => Self(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a finalized response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            status: parts.status,
            headers: parts.headers.clone(),
            body,
        }
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Errors raised when persisting an entry.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("entry of {size} bytes exceeds the {limit} byte limit")]
    EntryTooLarge { size: usize, limit: usize },

    #[error("response is not cacheable: {0}")]
    Uncacheable(String),
}

/// Key/value store for response snapshots.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn lookup(&self, key: &CacheKey) -> Option<CachedResponse>;

    async fn store(&self, key: CacheKey, entry: CachedResponse) -> Result<(), CacheError>;

    /// Whether stored entries can ever be looked up again.
    fn persists(&self) -> bool {
        true
    }
}

/// Named cache namespaces, opened on demand and shared across requests.
pub struct CacheStorage {
    namespaces: DashMap<String, Arc<MemoryCache>>,
    default_ttl: Duration,
    max_entry_bytes: usize,
    max_entries: usize,
}

impl CacheStorage {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            namespaces: DashMap::new(),
            default_ttl: Duration::from_secs(config.max_age_secs),
            max_entry_bytes: config.max_entry_bytes,
            max_entries: config.max_entries,
        }
    }

    /// Open (or create) the cache for a namespace.
    pub fn open(&self, namespace: &str) -> Arc<MemoryCache> {
        self.namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| {
                Arc::new(MemoryCache::new(
                    self.default_ttl,
                    self.max_entry_bytes,
                    self.max_entries,
                ))
            })
            .clone()
    }

    /// Pick the store strategy for an environment.
    pub fn for_environment(&self, environment: &Environment, namespace: &str) -> Arc<dyn CacheStore> {
        if environment.caches_responses() {
            self.open(namespace)
        } else {
            Arc::new(NullCache)
        }
    }
}
