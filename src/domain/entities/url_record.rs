//! URL record entity representing one long URL and its short code.

use chrono::{DateTime, Utc};

/// A persisted mapping between a short code and a long URL.
///
/// Records are created once and never updated. The short URL is not stored;
/// it is derived from the configured base URL with [`UrlRecord::short_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(code: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            long_url,
            created_at,
        }
    }

    /// Builds the public short URL for this record.
    pub fn short_url(&self, base_url: &str) -> String {
        build_short_url(base_url, &self.code)
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub code: String,
    pub long_url: String,
}

/// Joins a base URL and a code with exactly one `/`.
pub fn build_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let record = UrlRecord::new(
            "abc123XY".to_string(),
            "https://example.com/a".to_string(),
            now,
        );

        assert_eq!(record.code, "abc123XY");
        assert_eq!(record.long_url, "https://example.com/a");
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_short_url_is_derived_from_base() {
        let record = UrlRecord::new(
            "abc123XY".to_string(),
            "https://example.com/a".to_string(),
            Utc::now(),
        );

        assert_eq!(record.short_url("https://svc"), "https://svc/abc123XY");
        assert_eq!(record.short_url("https://svc/"), "https://svc/abc123XY");
    }
}
