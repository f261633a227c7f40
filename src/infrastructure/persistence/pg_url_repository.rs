//! PostgreSQL implementation of the record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::utils::db_error::map_store_error;

/// Advisory lock key serializing reference assignment ("SHORTURL" in ASCII).
const CREATE_LOCK_KEY: i64 = 0x5348_4F52_5455_524C;

#[derive(sqlx::FromRow)]
struct UrlRecordRow {
    url: String,
    short_ref: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlRecordRow> for UrlRecord {
    fn from(row: UrlRecordRow) -> Self {
        UrlRecord::new(row.url, row.short_ref, row.created_at)
    }
}

/// PostgreSQL repository for URL records.
///
/// # Reference Assignment
///
/// [`UrlRepository::create_next`] inserts `COUNT(*) + 1` inside a transaction
/// holding a transaction-scoped advisory lock. Creators are serialized, so
/// references stay sequential without gaps even across replicas sharing the
/// database. The `url` and `short_ref` unique constraints still arbitrate:
/// a lost race on the same URL surfaces as [`StoreError::DuplicateUrl`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecordRow>(
            "SELECT url, short_ref, created_at FROM url_records WHERE url = $1",
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_store_error)?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_ref(&self, short_ref: i64) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecordRow>(
            "SELECT url, short_ref, created_at FROM url_records WHERE short_ref = $1",
        )
        .bind(short_ref)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_store_error)?;

        Ok(row.map(UrlRecord::from))
    }

    async fn create_next(&self, url: &str) -> Result<UrlRecord, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_store_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CREATE_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(map_store_error)?;

        let row = sqlx::query_as::<_, UrlRecordRow>(
            r#"
            INSERT INTO url_records (url, short_ref)
            SELECT $1::text, COUNT(*) + 1 FROM url_records
            RETURNING url, short_ref, created_at
            "#,
        )
        .bind(url)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_store_error)?;

        tx.commit().await.map_err(map_store_error)?;

        Ok(row.into())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_records")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_store_error)
    }
}
