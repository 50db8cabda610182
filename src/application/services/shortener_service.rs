//! Short link creation and resolution service.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_original_url;

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Public scheme/host/port triple used to build fully-qualified short URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl PublicAddress {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Formats `{scheme}://{host}:{port}/{code}`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}://{}:{}/{}", self.scheme, self.host, self.port, code)
    }
}

impl Default for PublicAddress {
    fn default() -> Self {
        Self::new("http", "localhost", 8080)
    }
}

/// Tunables of the shortening flow.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Upper bound on generated candidates per request. Must be at least 1.
    pub max_attempts: u32,
    /// Reject an original URL that already has a short code.
    pub unique_original_urls: bool,
    pub public_address: PublicAddress,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            unique_original_urls: false,
            public_address: PublicAddress::default(),
        }
    }
}

/// Turns long URLs into unique short codes and resolves them back.
///
/// Holds no mapping state between calls: uniqueness of codes is enforced by
/// the repository, and the service only drives the generate → check → persist
/// loop on top of it.
pub struct ShortenerService<R: UrlRepository + ?Sized, G: CodeGenerator + ?Sized> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R: UrlRepository + ?Sized, G: CodeGenerator + ?Sized> ShortenerService<R, G> {
    /// Creates a new shortener service.
    pub fn new(repository: Arc<R>, generator: Arc<G>, settings: ShortenerSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Stores `original_url` under a freshly generated short code and returns the code.
    ///
    /// # Collision handling
    ///
    /// A candidate already present in storage is discarded and a new one is
    /// drawn, up to `max_attempts` candidates in total. Collisions are not
    /// surfaced to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not absolute; storage is
    /// not touched in that case.
    /// Returns [`AppError::Conflict`] if the URL is already shortened and
    /// `unique_original_urls` is set, or if another writer stored the same code
    /// (or, in that mode, the same original URL) between the check and the insert.
    /// Returns [`AppError::ExhaustedRetries`] when every candidate collided.
    /// Storage errors are propagated unchanged and never retried.
    pub async fn shorten(&self, original_url: &str) -> Result<String, AppError> {
        validate_original_url(original_url).map_err(|e| {
            AppError::bad_request(format!("original url does not fit the url format: {e}"))
        })?;

        if self.settings.unique_original_urls
            && let Some(existing) = self.repository.find_by_original_url(original_url).await?
        {
            warn!(code = %existing, "original url already shortened");
            return Err(AppError::conflict("this original url already exists"));
        }

        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            let candidate = self.generator.generate();

            if self.repository.find_by_code(&candidate).await?.is_some() {
                warn!(attempt, max_attempts, "short code collision, retrying");
                metrics::counter!("shortener_code_collisions_total").increment(1);
                continue;
            }

            let mapping = UrlMapping::new(candidate.clone(), original_url);
            if self.settings.unique_original_urls {
                self.repository.insert_unique_original(mapping).await?;
            } else {
                self.repository.insert(mapping).await?;
            }

            debug!(code = %candidate, attempt, "short url created");
            return Ok(candidate);
        }

        metrics::counter!("shortener_exhausted_retries_total").increment(1);
        Err(AppError::exhausted_retries(max_attempts))
    }

    /// Returns the original URL stored under `short_code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping uses this code.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        self.repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::not_found("no original url matches this short url"))
    }

    /// Builds the fully-qualified short URL for `short_code`.
    pub fn short_url(&self, short_code: &str) -> String {
        self.settings.public_address.short_url(short_code)
    }

    /// Reports whether the storage backend answers.
    pub async fn storage_healthy(&self) -> bool {
        self.repository.health_check().await
    }
}
