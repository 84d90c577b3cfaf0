//! Record store implementations.
//!
//! - [`PgUrlRepository`] - PostgreSQL storage with embedded migrations
//! - [`MemoryUrlRepository`] - In-process storage for `DATABASE_URL=memory://` and tests

pub mod memory_url_repository;
pub mod pg_url_repository;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::domain::repositories::UrlRepository;

pub use memory_url_repository::MemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;

/// Opens the record store selected by `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if PostgreSQL is unreachable or migrations fail. The
/// store is the source of truth, so the service refuses to start without it.
pub async fn open(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory record store; records will not survive a restart");
        return Ok(Arc::new(MemoryUrlRepository::new()));
    }

    Ok(Arc::new(PgUrlRepository::connect(config).await?))
}
