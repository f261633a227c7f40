//! Translation of SQLx errors into [`StoreError`].

use crate::domain::repositories::StoreError;

/// Unique constraint guarding `url_records.url`.
pub const URL_UNIQUE_CONSTRAINT: &str = "url_records_url_key";

/// Unique constraint guarding `url_records.short_ref`.
pub const SHORT_REF_UNIQUE_CONSTRAINT: &str = "url_records_short_ref_key";

/// Maps a SQLx error to the store error taxonomy.
///
/// Unique violations are classified by constraint name; everything else,
/// including pool timeouts and I/O failures, is a persistence error.
pub fn map_store_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some(URL_UNIQUE_CONSTRAINT) => return StoreError::DuplicateUrl,
            Some(SHORT_REF_UNIQUE_CONSTRAINT) => return StoreError::DuplicateRef,
            _ => {}
        }
    }

    StoreError::Persistence(e.to_string())
}
