//! Cache-aside creation and resolution of short links.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{
    CachedLink, CachedTarget, CreateStatus, NewUrlRecord, ShortLink, UrlRecord,
};
use crate::domain::repositories::UrlRepository;
use crate::error::{AppError, UniqueField};
use crate::infrastructure::cache::{CacheService, code_key, get_json, long_url_key, set_json};
use crate::utils::code_generator::CodeGenerator;

/// Default number of codes tried before giving up on a create.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Orchestrates the cache, the record store and the code generator.
///
/// The store is the only source of truth: its uniqueness constraints decide
/// every race. The cache is consulted first and populated lazily, and every
/// cache write is best-effort. The engine holds no locks and is shared across
/// requests behind an `Arc`.
pub struct ResolutionEngine {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    max_attempts: usize,
}

impl ResolutionEngine {
    /// Creates an engine building short URLs under `base_url`.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            cache,
            generator,
            base_url: base_url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the code collision retry budget (at least one attempt).
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns the short link for `long_url`, creating one if needed.
    ///
    /// # Flow
    ///
    /// 1. Cache hit on the long URL key is returned as-is
    /// 2. Otherwise an existing store record is returned and cached
    /// 3. Otherwise fresh codes are inserted until one sticks
    ///
    /// A long URL conflict on insert means a concurrent request created the
    /// record first; that record is re-read and returned, so every caller ends
    /// up with the same code. A code conflict just draws another code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GenerationExhausted`] when every attempt collided.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn create_short_link(&self, long_url: &str) -> Result<ShortLink, AppError> {
        let cache_key = long_url_key(long_url);

        if let Some(cached) = get_json::<CachedLink>(self.cache.as_ref(), &cache_key).await {
            debug!(long_url, code = %cached.code, "Create served from cache");
            return Ok(cached.into_short_link(CreateStatus::ServedFromCache));
        }

        if let Some(existing) = self.repository.find_by_long_url(long_url).await? {
            return Ok(self.existing_link(existing).await);
        }

        for attempt in 1..=self.max_attempts {
            let new_record = NewUrlRecord {
                code: self.generator.generate(),
                long_url: long_url.to_string(),
            };

            match self.repository.create(new_record).await {
                Ok(record) => return Ok(self.created_link(record).await),
                Err(AppError::DuplicateKey {
                    field: UniqueField::LongUrl,
                }) => {
                    debug!(long_url, "Lost create race, reading the winning record");
                    let winner = self
                        .repository
                        .find_by_long_url(long_url)
                        .await?
                        .ok_or_else(|| {
                            AppError::store_unavailable(
                                "record missing after long URL uniqueness violation",
                            )
                        })?;
                    return Ok(self.existing_link(winner).await);
                }
                Err(AppError::DuplicateKey {
                    field: UniqueField::Code,
                }) => {
                    debug!(attempt, max_attempts = self.max_attempts, "Short code collision");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            long_url,
            attempts = self.max_attempts,
            "Gave up allocating a short code"
        );
        Err(AppError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Resolves a short code to its long URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is in neither cache nor store.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn resolve_code(&self, code: &str) -> Result<String, AppError> {
        let cache_key = code_key(code);

        if let Some(CachedTarget {
            long_url: Some(long_url),
        }) = get_json(self.cache.as_ref(), &cache_key).await
        {
            debug!(code, "Resolve served from cache");
            return Ok(long_url);
        }

        let record = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        set_json(
            self.cache.as_ref(),
            &cache_key,
            &CachedTarget::new(record.long_url.as_str()),
            None,
        )
        .await;

        debug!(code, "Resolved from store");
        Ok(record.long_url)
    }

    async fn existing_link(&self, record: UrlRecord) -> ShortLink {
        let link = ShortLink::from_record(record, &self.base_url, CreateStatus::AlreadyExists);

        set_json(
            self.cache.as_ref(),
            &long_url_key(&link.long_url),
            &CachedLink::from(&link),
            None,
        )
        .await;

        debug!(code = %link.code, "Short link already exists");
        link
    }

    async fn created_link(&self, record: UrlRecord) -> ShortLink {
        let link = ShortLink::from_record(record, &self.base_url, CreateStatus::Created);
        let full = CachedLink::from(&link);
        let target = CachedTarget::new(link.long_url.as_str());
        let long_key = long_url_key(&link.long_url);
        let short_key = code_key(&link.code);

        // Two independent best-effort writes; neither outcome matters.
        tokio::join!(
            set_json(self.cache.as_ref(), &long_key, &full, None),
            set_json(self.cache.as_ref(), &short_key, &target, None),
        );

        debug!(code = %link.code, "Short link created");
        link
    }
}
