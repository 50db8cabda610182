//! Process-local implementation of the url repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Store {
    by_code: HashMap<String, String>,
    /// First code issued for each original URL.
    by_original: HashMap<String, String>,
}

/// In-memory repository guarded by a single reader/writer lock.
///
/// Lookups take the read side and run concurrently; inserts take the write
/// side, so the existence check and the insert happen under one guard.
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryUrlRepository {
    store: RwLock<Store>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        debug!("Using in-memory url storage");
        Self::default()
    }

    /// Number of stored mappings.
    pub async fn len(&self) -> usize {
        self.store.read().await.by_code.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Store {
    fn insert(&mut self, mapping: UrlMapping) -> Result<(), AppError> {
        if self.by_code.contains_key(&mapping.short_code) {
            return Err(AppError::conflict("this short url already exists"));
        }

        self.by_original
            .entry(mapping.original_url.clone())
            .or_insert_with(|| mapping.short_code.clone());
        self.by_code.insert(mapping.short_code, mapping.original_url);

        Ok(())
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn insert(&self, mapping: UrlMapping) -> Result<(), AppError> {
        self.store.write().await.insert(mapping)
    }

    async fn insert_unique_original(&self, mapping: UrlMapping) -> Result<(), AppError> {
        let mut store = self.store.write().await;

        if store.by_original.contains_key(&mapping.original_url) {
            return Err(AppError::conflict("this original url already exists"));
        }

        store.insert(mapping)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<String>, AppError> {
        Ok(self.store.read().await.by_code.get(short_code).cloned())
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<String>, AppError> {
        Ok(self.store.read().await.by_original.get(original_url).cloned())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
