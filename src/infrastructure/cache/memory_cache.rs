//! In-process cache backed by `moka`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::service::{CacheService, CacheStatus};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// A bounded in-memory cache for single-node deployments.
///
/// There is no network to lose, but the cache still honours the
/// connect/disconnect lifecycle: while disconnected every operation is a
/// miss or no-op, exactly like an unreachable Redis.
pub struct MemoryCache {
    cache: Cache<String, Entry>,
    connected: AtomicBool,
    default_ttl: Duration,
    key_prefix: String,
}

impl MemoryCache {
    /// Creates a connected cache holding at most `max_entries` entries.
    pub fn new(max_entries: u64, default_ttl_seconds: u64, key_prefix: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        debug!("Using MemoryCache (capacity: {})", max_entries);

        Self {
            cache,
            connected: AtomicBool::new(true),
            default_ttl: Duration::from_secs(default_ttl_seconds),
            key_prefix: key_prefix.into(),
        }
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn connect(&self) -> bool {
        self.connected.store(true, Ordering::Release);
        true
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        debug!("MemoryCache disconnected");
    }

    async fn reconnect(&self) -> bool {
        self.connect().await
    }

    async fn get(&self, key: &str) -> Option<String> {
        if !self.is_connected() {
            return None;
        }

        self.cache.get(&self.build_key(key)).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> bool {
        if !self.is_connected() {
            return false;
        }

        let ttl = ttl_seconds.map_or(self.default_ttl, Duration::from_secs);
        let entry = Entry {
            value: value.to_string(),
            ttl,
        };
        self.cache.insert(self.build_key(key), entry).await;
        true
    }

    async fn delete(&self, key: &str) -> bool {
        if !self.is_connected() {
            return false;
        }

        self.cache.remove(&self.build_key(key)).await.is_some()
    }

    async fn exists(&self, key: &str) -> bool {
        self.is_connected() && self.cache.contains_key(&self.build_key(key))
    }

    async fn status(&self) -> CacheStatus {
        CacheStatus {
            backend: "memory",
            connected: self.is_connected(),
            retry_count: 0,
            max_retries: 0,
        }
    }

    async fn health_check(&self) -> bool {
        self.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new(100, 60, "t:");

        assert!(cache.set("code:abc", r#"{"longUrl":"https://a.example"}"#, None).await);
        assert!(cache.exists("code:abc").await);
        assert_eq!(
            cache.get("code:abc").await.as_deref(),
            Some(r#"{"longUrl":"https://a.example"}"#)
        );

        assert!(cache.delete("code:abc").await);
        assert!(!cache.exists("code:abc").await);
        assert!(!cache.delete("code:abc").await);
    }

    #[tokio::test]
    async fn test_entries_expire_after_their_ttl() {
        let cache = MemoryCache::new(100, 60, "t:");

        cache.set("short", "v", Some(1)).await;
        assert!(cache.get("short").await.is_some());

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(cache.get("short").await.is_none());
    }

    #[tokio::test]
    async fn test_disconnected_cache_is_fail_open() {
        let cache = MemoryCache::new(100, 60, "t:");
        cache.set("k", "v", None).await;

        cache.disconnect().await;
        assert!(cache.get("k").await.is_none());
        assert!(!cache.set("k2", "v", None).await);
        assert!(!cache.status().await.connected);

        assert!(cache.connect().await);
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
        assert!(cache.get("k2").await.is_none());
    }
}
