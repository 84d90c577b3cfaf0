//! Short code generation and validation utilities.
//!
//! Generators are stateless and make no uniqueness promise: the record store's
//! constraint on `code` is the arbiter, and the resolution engine retries on
//! collision.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Characters a short code may contain.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of generated codes when not configured.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Upper bound on any code, generated or requested.
pub const MAX_CODE_LENGTH: usize = 20;

static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,20}$").expect("short code pattern is a valid regex")
});

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a URL-safe candidate code. May repeat.
    fn generate(&self) -> String;
}

/// Uniform random codes drawn from [`CODE_ALPHABET`].
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// The length is clamped to `1..=MAX_CODE_LENGTH`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

/// Validates a short code taken from a request path.
///
/// # Rules
///
/// - Length: 1-20 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-`
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the code breaks either rule.
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if CODE_REGEX.is_match(code) {
        return Ok(());
    }

    Err(AppError::bad_request(
        "URL code must be 1-20 characters of letters, digits, '_' or '-'",
        json!({ "code": code }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_configured_length() {
        assert_eq!(RandomCodeGenerator::new(8).generate().len(), 8);
        assert_eq!(RandomCodeGenerator::new(12).generate().len(), 12);
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(RandomCodeGenerator::new(0).length(), 1);
        assert_eq!(RandomCodeGenerator::new(64).length(), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_generated_codes_pass_validation() {
        let generator = RandomCodeGenerator::default();

        for _ in 0..200 {
            let code = generator.generate();
            assert!(validate_code(&code).is_ok(), "generated invalid code {code}");
        }
    }

    #[test]
    fn test_generate_code_produces_distinct_codes() {
        let generator = RandomCodeGenerator::default();
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_validate_accepts_full_charset() {
        assert!(validate_code("abc123XY").is_ok());
        assert!(validate_code("a").is_ok());
        assert!(validate_code("A_b-C_d-0123456789xy").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(validate_code("").is_err());
    }

    #[test]
    fn test_validate_rejects_too_long() {
        assert!(validate_code("abcdefghijklmnopqrstu").is_err());
    }

    #[test]
    fn test_validate_rejects_special_characters() {
        assert!(validate_code("my code").is_err());
        assert!(validate_code("abc/def").is_err());
        assert!(validate_code("abc.def").is_err());

        let err = validate_code("a:b").unwrap_err();
        assert!(err.to_string().contains("1-20 characters"));
    }
}
