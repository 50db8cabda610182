//! Url mapping entity: the single persisted record of the service.

/// Mapping between a generated short code and the original URL.
///
/// Created once by the shortener service and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub short_code: String,
    pub original_url: String,
}

impl UrlMapping {
    pub fn new(short_code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            original_url: original_url.into(),
        }
    }
}
