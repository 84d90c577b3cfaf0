//! Redis-backed cache implementation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::service::{CacheError, CacheResult, CacheService, CacheStatus};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tokio::sync::RwLock;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

/// Upper bound on a single connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis cache for URL lookups.
///
/// The connection is opened lazily by [`CacheService::connect`]; until then,
/// and after the retry budget is spent, every operation short-circuits to a
/// miss or no-op without touching the network.
///
/// # Retry Policy
///
/// Each failed connection attempt, and each connection-level error during an
/// operation, increments `retry_count`. A successful command resets it. When
/// `retry_count` reaches `max_retries` the connection is dropped and no
/// further attempts are made until [`CacheService::reconnect`] is called.
pub struct RedisCache {
    client: Client,
    manager: RwLock<Option<ConnectionManager>>,
    retry_count: AtomicU32,
    max_retries: u32,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Creates a disconnected Redis cache.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when `set` is called with `None`;
    ///   controlled via `CACHE_TTL_SECONDS`
    /// - `max_retries` - connection failures tolerated before giving up
    ///   (at least one attempt is always made); controlled via `CACHE_MAX_RETRIES`
    /// - `key_prefix` - namespace prepended to every key
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL cannot be parsed.
    /// No network I/O happens here.
    pub fn new(
        redis_url: &str,
        default_ttl_seconds: u64,
        max_retries: u32,
        key_prefix: impl Into<String>,
    ) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            manager: RwLock::new(None),
            retry_count: AtomicU32::new(0),
            max_retries: max_retries.max(1),
            default_ttl: default_ttl_seconds,
            key_prefix: key_prefix.into(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Clones the live connection, if there is one.
    async fn connection(&self) -> Option<ConnectionManager> {
        self.manager.read().await.clone()
    }

    /// Opens a connection and validates it with a PING.
    async fn open(&self) -> CacheResult<ConnectionManager> {
        let manager = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|_| CacheError::ConnectionError("Timed out connecting to Redis".to_string()))?
            .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e)))?;

        let mut conn = manager.clone();
        conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        Ok(manager)
    }

    /// One connection attempt, counted against the retry budget on failure.
    async fn attempt_connect(&self) -> CacheResult<()> {
        match self.open().await {
            Ok(manager) => {
                *self.manager.write().await = Some(manager);
                self.retry_count.store(0, Ordering::Release);
                info!("✓ Connected to Redis");
                Ok(())
            }
            Err(e) => {
                let attempt = self.retry_count.fetch_add(1, Ordering::AcqRel) + 1;
                if attempt < self.max_retries {
                    warn!(
                        error = %e,
                        "Retrying Redis connection ({}/{})",
                        attempt, self.max_retries
                    );
                } else {
                    warn!(error = %e, "Application will continue without Redis caching");
                }
                Err(e)
            }
        }
    }

    fn note_success(&self) {
        if self.retry_count.load(Ordering::Relaxed) != 0 {
            self.retry_count.store(0, Ordering::Release);
        }
    }

    /// Records a failed command; connection-level failures count against the budget.
    async fn note_failure(&self, e: &RedisError) {
        if !is_connection_error(e) {
            return;
        }

        let failures = self.retry_count.fetch_add(1, Ordering::AcqRel) + 1;
        if failures >= self.max_retries && self.manager.write().await.take().is_some() {
            warn!(
                failures,
                "Redis unreachable, continuing without caching until reconnect"
            );
        }
    }
}

fn is_connection_error(e: &RedisError) -> bool {
    e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
}

#[async_trait]
impl CacheService for RedisCache {
    async fn connect(&self) -> bool {
        if self.connection().await.is_some() {
            return true;
        }

        let used = self.retry_count.load(Ordering::Acquire);
        if used >= self.max_retries {
            debug!("Redis retry budget exhausted, not connecting");
            return false;
        }

        info!("Connecting to Redis");

        // The first attempt is immediate; the rest of the budget is spent with backoff.
        let remaining = (self.max_retries - used) as usize;
        let strategy = ExponentialBackoff::from_millis(10)
            .factor(10)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(remaining.saturating_sub(1));

        Retry::start(strategy, || self.attempt_connect()).await.is_ok()
    }

    async fn disconnect(&self) {
        if self.manager.write().await.take().is_some() {
            info!("Redis connection closed");
        }
    }

    async fn reconnect(&self) -> bool {
        self.disconnect().await;
        self.retry_count.store(0, Ordering::Release);
        self.connect().await
    }

    async fn get(&self, key: &str) -> Option<String> {
        let Some(mut conn) = self.connection().await else {
            debug!("Redis not connected, skipping GET");
            return None;
        };
        let full_key = self.build_key(key);

        match conn.get::<_, Option<String>>(&full_key).await {
            Ok(Some(value)) => {
                self.note_success();
                debug!("Cache HIT: {}", key);
                Some(value)
            }
            Ok(None) => {
                self.note_success();
                debug!("Cache MISS: {}", key);
                None
            }
            Err(e) => {
                warn!("Redis GET error for {}: {}", key, e);
                self.note_failure(&e).await;
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> bool {
        let Some(mut conn) = self.connection().await else {
            debug!("Redis not connected, skipping SET");
            return false;
        };
        let full_key = self.build_key(key);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match conn.set_ex::<_, _, ()>(&full_key, value, ttl).await {
            Ok(()) => {
                self.note_success();
                debug!("Cache SET: {} (TTL: {}s)", key, ttl);
                true
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                self.note_failure(&e).await;
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            debug!("Redis not connected, skipping DELETE");
            return false;
        };
        let full_key = self.build_key(key);

        match conn.del::<_, i64>(&full_key).await {
            Ok(deleted) => {
                self.note_success();
                deleted > 0
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", key, e);
                self.note_failure(&e).await;
                false
            }
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let full_key = self.build_key(key);

        match conn.exists::<_, bool>(&full_key).await {
            Ok(found) => {
                self.note_success();
                found
            }
            Err(e) => {
                warn!("Redis EXISTS error for {}: {}", key, e);
                self.note_failure(&e).await;
                false
            }
        }
    }

    async fn status(&self) -> CacheStatus {
        CacheStatus {
            backend: "redis",
            connected: self.connection().await.is_some(),
            retry_count: self.retry_count.load(Ordering::Acquire),
            max_retries: self.max_retries,
        }
    }

    async fn health_check(&self) -> bool {
        match self.connection().await {
            Some(mut conn) => conn.ping::<()>().await.is_ok(),
            None => false,
        }
    }
}
