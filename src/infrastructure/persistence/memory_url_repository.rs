//! In-process implementation of the URL repository.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::{AppError, UniqueField};

#[derive(Debug, Default)]
struct Tables {
    by_code: HashMap<String, UrlRecord>,
    code_by_long_url: HashMap<String, String>,
}

/// A record store kept in process memory.
///
/// Both uniqueness constraints are checked and applied under one lock, so
/// concurrent creators observe the same arbitration a database would give.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.tables.lock().map(|t| t.by_code.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulates an outage: while set, every operation fails with
    /// [`AppError::StoreUnavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, AppError> {
        if self.unavailable.load(Ordering::Acquire) {
            return Err(AppError::store_unavailable("memory store is offline"));
        }

        self.tables
            .lock()
            .map_err(|_| AppError::store_unavailable("memory store lock poisoned"))
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let mut tables = self.tables()?;

        if tables.code_by_long_url.contains_key(&new_record.long_url) {
            return Err(AppError::DuplicateKey {
                field: UniqueField::LongUrl,
            });
        }
        if tables.by_code.contains_key(&new_record.code) {
            return Err(AppError::DuplicateKey {
                field: UniqueField::Code,
            });
        }

        let record = UrlRecord::new(new_record.code, new_record.long_url, Utc::now());
        tables
            .code_by_long_url
            .insert(record.long_url.clone(), record.code.clone());
        tables.by_code.insert(record.code.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.tables()?.by_code.get(code).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>, AppError> {
        let tables = self.tables()?;

        Ok(tables
            .code_by_long_url
            .get(long_url)
            .and_then(|code| tables.by_code.get(code))
            .cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.tables().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(code: &str, url: &str) -> NewUrlRecord {
        NewUrlRecord {
            code: code.to_string(),
            long_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryUrlRepository::new();

        let created = repo
            .create(new_record("abc123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.code, "abc123");

        let by_code = repo.find_by_code("abc123").await.unwrap().unwrap();
        let by_url = repo
            .find_by_long_url("https://example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(by_code, created);
        assert_eq!(by_url, created);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = MemoryUrlRepository::new();

        assert!(repo.find_by_code("nope").await.unwrap().is_none());
        assert!(repo.find_by_long_url("https://nope").await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_long_url_is_rejected() {
        let repo = MemoryUrlRepository::new();
        repo.create(new_record("first", "https://example.com"))
            .await
            .unwrap();

        let err = repo
            .create(new_record("second", "https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DuplicateKey {
                field: UniqueField::LongUrl
            }
        ));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let repo = MemoryUrlRepository::new();
        repo.create(new_record("taken", "https://a.example"))
            .await
            .unwrap();

        let err = repo
            .create(new_record("taken", "https://b.example"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DuplicateKey {
                field: UniqueField::Code
            }
        ));
        assert!(repo.find_by_long_url("https://b.example").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_operation() {
        let repo = MemoryUrlRepository::new();
        repo.set_unavailable(true);

        assert!(matches!(
            repo.find_by_code("abc").await,
            Err(AppError::StoreUnavailable { .. })
        ));
        assert!(repo.health_check().await.is_err());

        repo.set_unavailable(false);
        assert!(repo.health_check().await.is_ok());
    }
}
