//! Record lookups for the shortening and redirect paths.

use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};

/// Looks up existing records on behalf of the shortening service.
///
/// Holds no state of its own. An existing record always wins over creating
/// a new one, so every dedup decision goes through
/// [`Resolver::resolve_for_shortening`].
#[derive(Clone)]
pub struct Resolver {
    repository: Arc<dyn UrlRepository>,
}

impl Resolver {
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self { repository }
    }

    /// Returns the record already registered for `url`, if any.
    pub async fn resolve_for_shortening(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.repository.find_by_url(url).await
    }

    /// Returns the record holding `short_ref`, if any.
    pub async fn resolve_for_redirect(
        &self,
        short_ref: i64,
    ) -> Result<Option<UrlRecord>, StoreError> {
        self.repository.find_by_ref(short_ref).await
    }
}
