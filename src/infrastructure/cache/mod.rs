//! Caching layer in front of the record store.
//!
//! Provides a fail-open [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache for single-node deployments
//! - [`NullCache`] - No-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

use std::sync::Arc;

use anyhow::Result;

use crate::config::{CacheBackend, Config};

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{
    CacheError, CacheResult, CacheService, CacheStatus, code_key, get_json, long_url_key, set_json,
};

#[cfg(test)]
pub use service::MockCacheService;

/// Builds the cache backend selected by the configuration.
///
/// The returned cache is not yet connected; call [`CacheService::connect`]
/// (typically from a background task) to bring it up.
///
/// # Errors
///
/// Returns an error if Redis is selected but its URL is missing or malformed.
pub fn build(config: &Config) -> Result<Arc<dyn CacheService>> {
    let cache: Arc<dyn CacheService> = match config.cache_backend {
        CacheBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("CACHE_BACKEND=redis requires REDIS_URL"))?;
            Arc::new(RedisCache::new(
                redis_url,
                config.cache_ttl_seconds,
                config.cache_max_retries,
                config.cache_key_prefix.clone(),
            )?)
        }
        CacheBackend::Memory => Arc::new(MemoryCache::new(
            config.cache_max_entries,
            config.cache_ttl_seconds,
            config.cache_key_prefix.clone(),
        )),
        CacheBackend::None => Arc::new(NullCache::new()),
    };

    Ok(cache)
}
