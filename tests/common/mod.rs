#![allow(dead_code)]

use sqlx::PgPool;
use std::sync::Arc;
use urlcut::application::services::{PublicAddress, ShortenerSettings};
use urlcut::config::StorageBackend;
use urlcut::domain::repositories::UrlRepository;
use urlcut::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
use urlcut::state::AppState;
use urlcut::utils::code_generator::RandomCodeGenerator;

pub const TEST_SEED: u64 = 42;

pub fn test_settings() -> ShortenerSettings {
    ShortenerSettings {
        max_attempts: 10,
        unique_original_urls: false,
        public_address: PublicAddress::new("http", "localhost", 8080),
    }
}

pub fn create_memory_state() -> AppState {
    create_memory_state_with(test_settings())
}

pub fn create_memory_state_with(settings: ShortenerSettings) -> AppState {
    AppState::new(
        Arc::new(InMemoryUrlRepository::new()),
        Arc::new(RandomCodeGenerator::from_seed(TEST_SEED)),
        settings,
        StorageBackend::Memory,
    )
}

pub fn create_state_with_repository(repository: Arc<dyn UrlRepository>) -> AppState {
    AppState::new(
        repository,
        Arc::new(RandomCodeGenerator::from_entropy()),
        test_settings(),
        StorageBackend::Memory,
    )
}

pub fn create_pg_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(PgUrlRepository::new(Arc::new(pool))),
        Arc::new(RandomCodeGenerator::from_entropy()),
        test_settings(),
        StorageBackend::Postgres,
    )
}

pub async fn create_test_url(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO url (short_url, original_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

/// Strips the public prefix from a returned short URL.
pub fn code_of(shortened_url: &str) -> &str {
    shortened_url
        .strip_prefix("http://localhost:8080/")
        .expect("short url carries the public prefix")
}
