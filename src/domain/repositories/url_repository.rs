//! Repository trait for url mapping storage.

use crate::domain::entities::UrlMapping;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for url mappings, keyed by short code.
///
/// Implementations must be safe for concurrent callers and must make the
/// uniqueness check of [`UrlRepository::insert`] atomic with respect to other
/// writers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local map
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL table
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already stored.
    /// Returns [`AppError::Timeout`] or [`AppError::Internal`] on backend failures.
    async fn insert(&self, mapping: UrlMapping) -> Result<(), AppError>;

    /// Persists a new mapping unless its original URL is already stored.
    ///
    /// The original URL check and the insert are atomic with respect to other
    /// writers of the same original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the original URL or the short code is
    /// already stored.
    async fn insert_unique_original(&self, mapping: UrlMapping) -> Result<(), AppError>;

    /// Looks up the original URL stored under `short_code`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` if found
    /// - `Ok(None)` if no mapping uses this code
    async fn find_by_code(&self, short_code: &str) -> Result<Option<String>, AppError>;

    /// Looks up a short code already assigned to `original_url`.
    ///
    /// When the URL was shortened several times, any one of its codes may be
    /// returned.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<String>, AppError>;

    /// Checks whether the storage backend is reachable.
    async fn health_check(&self) -> bool;
}
