//! URL record entity representing a registered URL and its short reference.

use chrono::{DateTime, Utc};

/// A registered URL and the reference assigned to it.
///
/// Both `url` and `short_ref` are unique across all records. References are
/// handed out in registration order starting at 1 and are never reused.
/// Records are created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub url: String,
    pub short_ref: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(url: String, short_ref: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            url,
            short_ref,
            created_at,
        }
    }
}
