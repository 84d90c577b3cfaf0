//! Core domain entities.
//!
//! - [`UrlRecord`] - A persisted long URL / short code pair
//! - [`NewUrlRecord`] - Input for creating a record
//! - [`ShortLink`] - What `create_short_link` hands back, tagged with a [`CreateStatus`]
//! - [`CachedLink`] / [`CachedTarget`] - JSON payloads kept in the cache

pub mod short_link;
pub mod url_record;

pub use short_link::{CachedLink, CachedTarget, CreateStatus, ShortLink};
pub use url_record::{NewUrlRecord, UrlRecord, build_short_url};
