//! Application layer services implementing business logic.
//!
//! This layer orchestrates the record store, the cache and the code generator.
//! Services consume the repository and cache traits and provide a clean API
//! for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::resolution_engine::ResolutionEngine`] - Short link creation and resolution

pub mod services;
