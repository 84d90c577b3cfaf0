//! No-op cache implementation for disabled caching.

use super::service::{CacheService, CacheStatus};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Selected with `CACHE_BACKEND=none`, or when no Redis is configured. Every
/// read is a miss and every write is dropped, so the engine runs store-only.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn connect(&self) -> bool {
        false
    }

    async fn disconnect(&self) {}

    async fn reconnect(&self) -> bool {
        false
    }

    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: Option<u64>) -> bool {
        false
    }

    async fn delete(&self, _key: &str) -> bool {
        false
    }

    async fn exists(&self, _key: &str) -> bool {
        false
    }

    async fn status(&self) -> CacheStatus {
        CacheStatus {
            backend: "none",
            connected: false,
            retry_count: 0,
            max_retries: 0,
        }
    }

    // Nothing to be unhealthy about.
    async fn health_check(&self) -> bool {
        true
    }
}
