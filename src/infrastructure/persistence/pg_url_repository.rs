//! PostgreSQL implementation of the url repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Default deadline for a single repository call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL repository backed by the `url` table.
///
/// Uniqueness of `short_url` is enforced by the `url_short_url_key` constraint:
/// `insert` issues a single `INSERT` and reports a violation of that constraint
/// as [`AppError::Conflict`], so there is no window between a check and the write.
///
/// Every call is bounded by `operation_timeout` and fails with
/// [`AppError::Timeout`] when the deadline passes.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    operation_timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with the default 5 second deadline.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, DEFAULT_OPERATION_TIMEOUT)
    }

    /// Creates a new repository with a custom per-call deadline.
    pub fn with_timeout(pool: Arc<PgPool>, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }

    async fn with_deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::timeout(format!(
                "pg.UrlRepository.{operation} exceeded {:?}",
                self.operation_timeout
            ))),
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, mapping: UrlMapping) -> Result<(), AppError> {
        self.with_deadline(
            "insert",
            sqlx::query("INSERT INTO url (short_url, original_url) VALUES ($1, $2)")
                .bind(&mapping.short_code)
                .bind(&mapping.original_url)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn insert_unique_original(&self, mapping: UrlMapping) -> Result<(), AppError> {
        let pool = self.pool.as_ref();

        // Writers of the same original url serialize on a transaction-scoped
        // advisory lock, so the existence check and the insert cannot interleave.
        let inserted = self
            .with_deadline("insert_unique_original", async {
                let mut tx = pool.begin().await?;

                sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
                    .bind(&mapping.original_url)
                    .execute(&mut *tx)
                    .await?;

                let taken: bool = sqlx::query_scalar(
                    "SELECT EXISTS (SELECT 1 FROM url WHERE original_url = $1)",
                )
                .bind(&mapping.original_url)
                .fetch_one(&mut *tx)
                .await?;

                if taken {
                    tx.rollback().await?;
                    return Ok(false);
                }

                sqlx::query("INSERT INTO url (short_url, original_url) VALUES ($1, $2)")
                    .bind(&mapping.short_code)
                    .bind(&mapping.original_url)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;
                Ok::<bool, sqlx::Error>(true)
            })
            .await?;

        if inserted {
            Ok(())
        } else {
            Err(AppError::conflict("this original url already exists"))
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<String>, AppError> {
        self.with_deadline(
            "find_by_code",
            sqlx::query_scalar::<_, String>("SELECT original_url FROM url WHERE short_url = $1")
                .bind(short_code)
                .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<String>, AppError> {
        self.with_deadline(
            "find_by_original_url",
            sqlx::query_scalar::<_, String>(
                "SELECT short_url FROM url WHERE original_url = $1 ORDER BY created_at LIMIT 1",
            )
            .bind(original_url)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn health_check(&self) -> bool {
        self.with_deadline(
            "health_check",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()),
        )
        .await
        .is_ok()
    }
}
