//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[serde(rename = "longUrl", default)]
    #[validate(length(min = 1, message = "longUrl is required"))]
    pub long_url: String,
}

/// Response envelope for a shorten request.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub status: bool,
    pub message: String,
    pub data: ShortenData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenData {
    pub url_code: String,
    pub short_url: String,
    pub long_url: String,
}

impl From<ShortLink> for ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            status: true,
            message: link.status.message().to_string(),
            data: ShortenData {
                url_code: link.code,
                short_url: link.short_url,
                long_url: link.long_url,
            },
        }
    }
}
