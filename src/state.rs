//! Shared state injected into every HTTP handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::ResolutionEngine;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Application state cloned into each request.
///
/// The repository and cache are the same instances the engine wraps; the
/// handlers only touch them directly for health reporting.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ResolutionEngine>,
    pub repository: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
    pub url_max_length: usize,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        engine: Arc<ResolutionEngine>,
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        url_max_length: usize,
    ) -> Self {
        Self {
            engine,
            repository,
            cache,
            url_max_length,
            started_at: Instant::now(),
        }
    }
}
