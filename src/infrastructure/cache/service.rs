//! Cache service trait, connection status and typed JSON helpers.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// Errors raised while opening a cache connection.
///
/// These never leave the cache layer: [`CacheService`] methods log them and
/// degrade to a miss or no-op.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Snapshot of a backend's connection state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheStatus {
    pub backend: &'static str,
    pub connected: bool,
    pub retry_count: u32,
    pub max_retries: u32,
}

/// A fail-open key/value cache with TTL.
///
/// Every method absorbs backend failures: reads report a miss, writes report
/// `false`. Return values of mutating methods are informational only and must
/// never drive error handling in callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with retry tracking
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache with per-entry TTL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Establishes the backend connection. Idempotent.
    ///
    /// Returns `true` when the cache is usable afterwards.
    async fn connect(&self) -> bool;

    /// Releases the connection; later operations behave as disconnected.
    async fn disconnect(&self);

    /// Resets the retry budget and tries to connect again.
    async fn reconnect(&self) -> bool;

    /// Returns the cached text for `key`, or `None` on miss or any failure.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// `ttl_seconds = None` applies the backend's configured default.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> bool;

    /// Removes `key`. Returns `true` if something was deleted.
    async fn delete(&self, key: &str) -> bool;

    /// Returns `true` if `key` is present. Failures read as absent.
    async fn exists(&self, key: &str) -> bool;

    /// Reports connection and retry state.
    async fn status(&self) -> CacheStatus;

    /// Checks if the cache backend answers right now.
    async fn health_check(&self) -> bool;
}

/// Cache key for the full payload of a long URL.
pub fn long_url_key(long_url: &str) -> String {
    format!("long:{long_url}")
}

/// Cache key for the redirect payload of a short code.
pub fn code_key(code: &str) -> String {
    format!("code:{code}")
}

/// Reads `key` and decodes its JSON payload.
///
/// Undecodable payloads are logged and treated as a miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    let raw = cache.get(key).await?;

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Ignoring undecodable cache entry");
            None
        }
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub async fn set_json<T: Serialize + ?Sized>(
    cache: &dyn CacheService,
    key: &str,
    value: &T,
    ttl_seconds: Option<u64>,
) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => cache.set(key, &json, ttl_seconds).await,
        Err(e) => {
            warn!(key, error = %e, "Failed to serialize cache value");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn test_namespaces_do_not_overlap() {
        assert_eq!(long_url_key("abc"), "long:abc");
        assert_eq!(code_key("abc"), "code:abc");
        assert_ne!(long_url_key("abc"), code_key("abc"));
    }

    #[tokio::test]
    async fn test_get_json_decodes_payload() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .withf(|key| key == "k")
            .returning(|_| Some(r#"{"value":7}"#.to_string()));

        let payload: Option<Payload> = get_json(&cache, "k").await;
        assert_eq!(payload, Some(Payload { value: 7 }));
    }

    #[tokio::test]
    async fn test_get_json_treats_garbage_as_miss() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .returning(|_| Some("not json".to_string()));

        let payload: Option<Payload> = get_json(&cache, "k").await;
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_set_json_writes_canonical_text() {
        let mut cache = MockCacheService::new();
        cache
            .expect_set()
            .withf(|key, value, ttl| key == "k" && value == r#"{"value":3}"# && ttl.is_none())
            .times(1)
            .returning(|_, _, _| true);

        assert!(set_json(&cache, "k", &Payload { value: 3 }, None).await);
    }
}
