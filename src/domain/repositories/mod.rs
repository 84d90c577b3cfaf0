//! Repository trait definitions for the domain layer.
//!
//! The traits here are the contract the resolution engine relies on; concrete
//! stores live in `crate::infrastructure::persistence`. Mock implementations
//! are generated with `mockall` for unit tests.

pub mod url_repository;

pub use url_repository::UrlRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
