#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use redislink::application::services::ResolutionEngine;
use redislink::domain::entities::{NewUrlRecord, UrlRecord};
use redislink::domain::repositories::UrlRepository;
use redislink::error::{AppError, UniqueField};
use redislink::infrastructure::cache::{CacheService, MemoryCache};
use redislink::infrastructure::persistence::MemoryUrlRepository;
use redislink::state::AppState;
use redislink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const BASE_URL: &str = "https://svc";

/// Generator that hands out a fixed script of codes, repeating the last one.
pub struct ScriptedGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedGenerator {
    pub fn new(codes: &[&str]) -> Self {
        let codes: VecDeque<String> = codes.iter().map(|c| c.to_string()).collect();
        let last = codes.back().cloned().unwrap_or_default();
        Self {
            codes: Mutex::new(codes),
            last: Mutex::new(last),
        }
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self) -> String {
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => code,
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// Memory store whose first `parties` long URL lookups wait for each other.
///
/// Every creator sees "not found" before any of them inserts, so all but one
/// lose on the long URL constraint.
pub struct GatedRepository {
    inner: MemoryUrlRepository,
    barrier: Barrier,
    parties: usize,
    lookups: AtomicUsize,
    long_url_conflicts: AtomicUsize,
}

impl GatedRepository {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: MemoryUrlRepository::new(),
            barrier: Barrier::new(parties),
            parties,
            lookups: AtomicUsize::new(0),
            long_url_conflicts: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn long_url_conflicts(&self) -> usize {
        self.long_url_conflicts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlRepository for GatedRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let result = self.inner.create(new_record).await;
        if let Err(AppError::DuplicateKey {
            field: UniqueField::LongUrl,
        }) = &result
        {
            self.long_url_conflicts.fetch_add(1, Ordering::SeqCst);
        }
        result
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        self.inner.find_by_code(code).await
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>, AppError> {
        let found = self.inner.find_by_long_url(long_url).await;
        if self.lookups.fetch_add(1, Ordering::SeqCst) < self.parties {
            self.barrier.wait().await;
        }
        found
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.inner.health_check().await
    }
}

pub struct Harness {
    pub repository: Arc<MemoryUrlRepository>,
    pub cache: Arc<dyn CacheService>,
    pub engine: Arc<ResolutionEngine>,
}

impl Harness {
    pub fn state(&self) -> AppState {
        AppState::new(
            self.engine.clone(),
            self.repository.clone(),
            self.cache.clone(),
            2048,
        )
    }
}

pub fn memory_cache() -> Arc<dyn CacheService> {
    Arc::new(MemoryCache::new(1_000, 60, "test:"))
}

pub fn harness_with(
    cache: Arc<dyn CacheService>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
) -> Harness {
    let repository = Arc::new(MemoryUrlRepository::new());
    let engine = ResolutionEngine::new(repository.clone(), cache.clone(), generator, BASE_URL)
        .with_max_attempts(max_attempts);

    Harness {
        repository,
        cache,
        engine: Arc::new(engine),
    }
}

/// Memory store, connected memory cache, random 8-character codes.
pub fn harness() -> Harness {
    harness_with(memory_cache(), Arc::new(RandomCodeGenerator::default()), 5)
}
