//! Long URL acceptance rules.
//!
//! URLs are stored exactly as submitted (after trimming surrounding
//! whitespace); two URLs that differ by a single byte are distinct records.

use std::sync::LazyLock;

use regex::RegexSet;
use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Default maximum accepted long URL length, in bytes.
pub const DEFAULT_MAX_URL_LENGTH: usize = 2048;

/// Largest configurable limit that still fits the store's unique index.
pub const MAX_URL_LENGTH: usize = 2048;

static SUSPICIOUS_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)javascript:",
        r"(?i)data:",
        r"(?i)vbscript:",
        r"(?i)<script",
        r"(?i)\bon\w+=",
    ])
    .expect("suspicious URL patterns are valid regexes")
});

/// Reasons a long URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("longUrl is required")]
    Empty,

    #[error("longUrl must be no more than {max} characters long")]
    TooLong { max: usize, actual: usize },

    #[error("Please provide a valid URL with http:// or https://")]
    InvalidFormat(String),

    #[error("URL must use HTTP or HTTPS protocol")]
    UnsupportedProtocol,

    #[error("URL contains potentially malicious content")]
    SuspiciousContent,
}

impl From<UrlValidationError> for AppError {
    fn from(e: UrlValidationError) -> Self {
        let details = match &e {
            UrlValidationError::TooLong { max, actual } => {
                json!({ "max_length": max, "provided_length": actual })
            }
            UrlValidationError::InvalidFormat(reason) => json!({ "reason": reason }),
            _ => json!({}),
        };

        AppError::bad_request(e.to_string(), details)
    }
}

/// Checks a submitted long URL and returns the value to store.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed; the result must be non-empty
/// 2. Length must not exceed `max_length`
/// 3. Must parse as an absolute `http` or `https` URL with a host
/// 4. Must not contain script-injection patterns
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule that fails.
pub fn validate_long_url(input: &str, max_length: usize) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.len() > max_length {
        return Err(UrlValidationError::TooLong {
            max: max_length,
            actual: trimmed.len(),
        });
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat(
            "URL must include a host".to_string(),
        ));
    }

    if SUSPICIOUS_PATTERNS.is_match(trimmed) {
        return Err(UrlValidationError::SuspiciousContent);
    }

    Ok(trimmed.to_string())
}
