//! Always-miss store used where caching is disabled.

use async_trait::async_trait;

use crate::cache::{CacheError, CacheKey, CacheStore, CachedResponse};

#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl CacheStore for NullCache {
    async fn lookup(&self, _key: &CacheKey) -> Option<CachedResponse> {
        None
    }

    async fn store(&self, _key: CacheKey, _entry: CachedResponse) -> Result<(), CacheError> {
        Ok(())
    }

    fn persists(&self) -> bool {
        false
    }
}
