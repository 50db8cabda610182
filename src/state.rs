//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ShortenerService, ShortenerSettings};
use crate::config::StorageBackend;
use crate::domain::repositories::UrlRepository;
use crate::utils::code_generator::CodeGenerator;

/// Shortener wired to trait objects, so the backend is picked at startup.
pub type DynShortenerService = ShortenerService<dyn UrlRepository, dyn CodeGenerator>;

/// Application state cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<DynShortenerService>,
    /// Backend name reported by the health check.
    pub storage: StorageBackend,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        generator: Arc<dyn CodeGenerator>,
        settings: ShortenerSettings,
        storage: StorageBackend,
    ) -> Self {
        Self {
            shortener: Arc::new(ShortenerService::new(repository, generator, settings)),
            storage,
        }
    }
}
