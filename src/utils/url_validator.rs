//! Validation of URLs submitted for shortening.

use url::Url;

/// Reasons an original URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("url is empty")]
    Empty,

    #[error("invalid url format: {0}")]
    InvalidFormat(String),

    #[error("url has no host")]
    MissingHost,
}

/// Checks that `input` is an absolute URI with a non-empty scheme and host.
///
/// The URL is not rewritten: the caller stores exactly what was submitted.
/// Because of that, inputs the WHATWG parser would silently repair are
/// rejected: whitespace or control characters anywhere, backslashes, and a
/// scheme not followed by `://`.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_original_url("http://ya.ru").is_ok());
/// assert!(validate_original_url("not-a-url").is_err());
/// assert!(validate_original_url("mailto:someone@example.com").is_err());
/// ```
pub fn validate_original_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if let Some(c) = input
        .chars()
        .find(|c| c.is_ascii_whitespace() || c.is_control() || *c == '\\')
    {
        return Err(UrlValidationError::InvalidFormat(format!(
            "forbidden character {c:?}"
        )));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlValidationError::MissingHost),
    }

    // The scheme is ASCII and nothing was stripped above, so offsets match.
    let after_scheme = input.get(url.scheme().len()..).unwrap_or_default();
    if !after_scheme.starts_with("://") {
        return Err(UrlValidationError::InvalidFormat(
            "scheme must be followed by '://'".to_string(),
        ));
    }

    Ok(())
}
