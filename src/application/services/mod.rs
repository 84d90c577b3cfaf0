//! Business logic services for the application layer.

pub mod resolution_engine;

pub use resolution_engine::{DEFAULT_MAX_ATTEMPTS, ResolutionEngine};
