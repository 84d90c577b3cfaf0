//! Result of a create request and the payloads cached for it.

use serde::{Deserialize, Serialize};

use super::url_record::UrlRecord;

/// How a create request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateStatus {
    /// Returned from the cache without touching the store.
    ServedFromCache,
    /// A record for the long URL was already in the store.
    AlreadyExists,
    /// A new record was inserted.
    Created,
}

impl CreateStatus {
    /// Human-readable summary used in API responses.
    pub fn message(self) -> &'static str {
        match self {
            Self::ServedFromCache => "URL retrieved from cache",
            Self::AlreadyExists => "Short URL already exists",
            Self::Created => "Short URL created successfully",
        }
    }
}

/// A short link as returned to callers of `create_short_link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub status: CreateStatus,
}

impl ShortLink {
    pub fn from_record(record: UrlRecord, base_url: &str, status: CreateStatus) -> Self {
        Self {
            short_url: record.short_url(base_url),
            code: record.code,
            long_url: record.long_url,
            status,
        }
    }
}

/// Full payload cached under a long URL key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLink {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
}

impl CachedLink {
    pub fn into_short_link(self, status: CreateStatus) -> ShortLink {
        ShortLink {
            code: self.code,
            short_url: self.short_url,
            long_url: self.long_url,
            status,
        }
    }
}

impl From<&ShortLink> for CachedLink {
    fn from(link: &ShortLink) -> Self {
        Self {
            code: link.code.clone(),
            short_url: link.short_url.clone(),
            long_url: link.long_url.clone(),
        }
    }
}

/// Minimal payload cached under a code key: just enough to redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_url: Option<String>,
}

impl CachedTarget {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: Some(long_url.into()),
        }
    }
}
