//! Url repository implementations.
//!
//! - [`InMemoryUrlRepository`] - Process-local storage behind one reader/writer lock
//! - [`PgUrlRepository`] - PostgreSQL storage with per-call deadlines

pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::InMemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
