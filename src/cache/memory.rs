//! In-process cache namespace backed by `DashMap`.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheError, CacheKey, CacheStore, CachedResponse};

struct StoredEntry {
    response: CachedResponse,
    expires_at: Instant,
}

/// Thread-safe response cache with per-entry expiry taken from `Cache-Control`.
///
/// Expired entries are dropped on every store, and the namespace never holds
/// more than `max_entries`: when full, the entry closest to expiry goes first.
pub struct MemoryCache {
    entries: DashMap<CacheKey, StoredEntry>,
    default_ttl: Duration,
    max_entry_bytes: usize,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration, max_entry_bytes: usize, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            max_entry_bytes,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry that is no longer fresh. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Make room for `key` by evicting the soonest-expiring entries.
    fn make_room(&self, key: &CacheKey) {
        while self.entries.len() >= self.max_entries && !self.entries.contains_key(key) {
            let victim = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().expires_at)
                .map(|entry| entry.key().clone());
            let Some(victim) = victim else {
                return;
            };
            self.entries.remove(&victim);
            tracing::debug!(key = %victim, "Evicted cache entry");
        }
    }

    fn freshness(&self, headers: &HeaderMap) -> Result<Duration, CacheError> {
        let Some(value) = headers.get(header::CACHE_CONTROL) else {
            return Ok(self.default_ttl);
        };
        let value = value
            .to_str()
            .map_err(|_| CacheError::Uncacheable("unreadable cache-control".into()))?;

        let mut max_age = None;
        let mut shared_max_age = None;
        for directive in value.split(',').map(str::trim) {
            let (name, arg) = match directive.split_once('=') {
                Some((name, arg)) => (name.trim(), Some(arg.trim().trim_matches('"'))),
                None => (directive, None),
            };
            match name.to_ascii_lowercase().as_str() {
                "no-store" | "private" => {
                    return Err(CacheError::Uncacheable(format!("cache-control: {}", value)));
                }
                "max-age" => max_age = arg.and_then(|a| a.parse::<u64>().ok()),
                "s-maxage" => shared_max_age = arg.and_then(|a| a.parse::<u64>().ok()),
                _ => {}
            }
        }

        Ok(shared_max_age
            .or(max_age)
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl))
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn lookup(&self, key: &CacheKey) -> Option<CachedResponse> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.response.clone());
            }
            drop(entry);
            self.entries.remove(key);
        }
        None
    }

    async fn store(&self, key: CacheKey, entry: CachedResponse) -> Result<(), CacheError> {
        if entry.body.len() > self.max_entry_bytes {
            return Err(CacheError::EntryTooLarge {
                size: entry.body.len(),
                limit: self.max_entry_bytes,
            });
        }
        let ttl = self.freshness(&entry.headers)?;
        if ttl.is_zero() {
            return Err(CacheError::Uncacheable("zero freshness lifetime".into()));
        }

        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired cache entries");
        }
        self.make_room(&key);

        self.entries.insert(
            key,
            StoredEntry {
                response: entry,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
