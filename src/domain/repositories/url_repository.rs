//! Record store contract for URL records.

use crate::domain::entities::UrlRecord;
use async_trait::async_trait;

/// Failures reported by a record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record for this URL already exists (unique constraint on `url`).
    #[error("a record for this url already exists")]
    DuplicateUrl,

    /// The computed reference is already taken (unique constraint on `short_ref`).
    #[error("the computed short reference is already assigned")]
    DuplicateRef,

    /// Underlying storage failure: connection loss, I/O error, timeout.
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Persistent mapping of URL to short reference.
///
/// The store is the single source of truth for existence and reference
/// assignment. All coordination between concurrent writers goes through its
/// uniqueness constraints; callers hold no locks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Exact, case-sensitive lookup by URL. A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on storage failures.
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Exact lookup by short reference. A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on storage failures.
    async fn find_by_ref(&self, short_ref: i64) -> Result<Option<UrlRecord>, StoreError>;

    /// Persists a new record whose reference is `count(all records) + 1`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateUrl`] if a record for `url` already exists
    /// - [`StoreError::DuplicateRef`] if the computed reference collides
    /// - [`StoreError::Persistence`] on storage failures
    async fn create_next(&self, url: &str) -> Result<UrlRecord, StoreError>;

    /// Counts all stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on storage failures.
    async fn count(&self) -> Result<i64, StoreError>;
}
