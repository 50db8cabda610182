//! DTOs for link shortening and resolution endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. Format checks happen in the service.
    #[validate(length(min = 1, message = "original_url must not be empty"))]
    pub original_url: String,
}

/// Fully-qualified short URL returned by `POST /shorten`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub shortened_url: String,
}

/// Original URL returned by `GET /{shortened_url}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OriginalUrlResponse {
    pub original_url: String,
}
