//! In-memory implementation of the record store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};

#[derive(Default)]
struct Records {
    by_url: HashMap<String, UrlRecord>,
    by_ref: HashMap<i64, String>,
}

/// Process-local record store.
///
/// Each create runs under the write lock, so the count and the insert are
/// one atomic step and references come out sequential. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: RwLock<Records>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.records.read().await.by_url.get(url).cloned())
    }

    async fn find_by_ref(&self, short_ref: i64) -> Result<Option<UrlRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .by_ref
            .get(&short_ref)
            .and_then(|url| records.by_url.get(url))
            .cloned())
    }

    async fn create_next(&self, url: &str) -> Result<UrlRecord, StoreError> {
        let mut records = self.records.write().await;

        if records.by_url.contains_key(url) {
            return Err(StoreError::DuplicateUrl);
        }

        let next = records.by_url.len() as i64 + 1;
        if records.by_ref.contains_key(&next) {
            return Err(StoreError::DuplicateRef);
        }

        let record = UrlRecord::new(url.to_string(), next, Utc::now());
        records.by_ref.insert(next, url.to_string());
        records.by_url.insert(url.to_string(), record.clone());

        Ok(record)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.records.read().await.by_url.len() as i64)
    }
}
