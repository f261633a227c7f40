//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request to shorten a URL.
///
/// Accepted as JSON or as a urlencoded form with a `url` field. A missing
/// field deserializes as empty and fails validation. The byte-length cap
/// is enforced by [`crate::application::validator::UrlValidator`].
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub url: String,
}

/// A registered URL and its reference.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: i64,
}

impl From<UrlRecord> for ShortenResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            original_url: record.url,
            short_url: record.short_ref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let ok = ShortenRequest {
            url: "https://example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = ShortenRequest { url: String::new() };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_response_shape() {
        let record = UrlRecord::new("https://www.example.com".to_string(), 1, chrono::Utc::now());
        let json = serde_json::to_value(ShortenResponse::from(record)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "original_url": "https://www.example.com", "short_url": 1 })
        );
    }
}
