//! Get-or-create registration of URLs and redirect resolution.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::application::resolver::Resolver;
use crate::application::validator::{UrlValidator, ValidationError};
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{StoreError, UrlRepository};

/// A reference token is one or more ASCII digits and nothing else.
static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("reference pattern is valid"));

/// Failures of [`ShorteningService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortenError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] ValidationError),

    #[error("storage failure: {0}")]
    StorageFailure(StoreError),
}

/// Failures of [`ShorteningService::resolve_redirect`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The token is not a non-negative decimal integer.
    #[error("invalid url reference: {0:?}")]
    InvalidReference(String),

    /// The token is numeric but no record holds that reference.
    #[error("no url registered for reference {0}")]
    ReferenceNotFound(String),

    #[error("storage failure: {0}")]
    StorageFailure(StoreError),
}

/// Parses a reference token from a request path.
///
/// Accepts digits only. Leading zeros are permitted and stripped, so `"007"`
/// is reference 7. A digit string too large for any stored reference is
/// reported as [`ResolveError::ReferenceNotFound`], since it is well-formed
/// but cannot name a record.
pub fn parse_reference(ref_text: &str) -> Result<i64, ResolveError> {
    if !REFERENCE_REGEX.is_match(ref_text) {
        return Err(ResolveError::InvalidReference(ref_text.to_string()));
    }

    let digits = ref_text.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<i64>()
        .map_err(|_| ResolveError::ReferenceNotFound(digits.to_string()))
}

/// Registers URLs and resolves references back to them.
///
/// # Shortening Flow
///
/// `Received -> Validating -> Deduping -> (Existing | Creating) -> Done | Rejected`
///
/// 1. Validate the URL; failures are rejected as [`ShortenError::InvalidUrl`]
/// 2. Return the existing record if the exact URL is already registered
/// 3. Otherwise create the next record
/// 4. If a concurrent request registered the same URL first
///    ([`StoreError::DuplicateUrl`]), return that record instead
/// 5. Any other store failure is rejected as [`ShortenError::StorageFailure`];
///    nothing is retried
///
/// The service holds no locks and no mutable state; every coordination
/// decision is made by the store's uniqueness constraints.
#[derive(Clone)]
pub struct ShorteningService {
    validator: UrlValidator,
    resolver: Resolver,
    repository: Arc<dyn UrlRepository>,
}

impl ShorteningService {
    /// Creates a service over a shared store handle.
    pub fn new(repository: Arc<dyn UrlRepository>, validator: UrlValidator) -> Self {
        Self {
            validator,
            resolver: Resolver::new(repository.clone()),
            repository,
        }
    }

    /// Returns the record for `raw_url`, registering it first if needed.
    ///
    /// Idempotent: submitting the same URL again returns the same reference.
    ///
    /// # Errors
    ///
    /// - [`ShortenError::InvalidUrl`] if validation fails
    /// - [`ShortenError::StorageFailure`] on `DuplicateRef` or persistence errors
    pub async fn shorten(&self, raw_url: &str) -> Result<UrlRecord, ShortenError> {
        debug!(url = raw_url, phase = "validating", "Shortening request received");
        let parsed = self.validator.validate(raw_url).await.inspect_err(|e| {
            debug!(url = raw_url, phase = "rejected", reason = %e, "URL rejected");
        })?;

        debug!(url = raw_url, phase = "deduping", "Checking for existing record");
        if let Some(existing) = self
            .resolver
            .resolve_for_shortening(parsed.as_str())
            .await
            .map_err(|e| storage_failure(raw_url, e))?
        {
            debug!(
                url = raw_url,
                short_ref = existing.short_ref,
                phase = "existing",
                "URL already registered"
            );
            return Ok(existing);
        }

        debug!(url = raw_url, phase = "creating", "Registering new record");
        match self.repository.create_next(parsed.as_str()).await {
            Ok(record) => {
                info!(url = %record.url, short_ref = record.short_ref, "URL registered");
                Ok(record)
            }
            Err(StoreError::DuplicateUrl) => {
                warn!(url = raw_url, "Concurrent registration won the race, returning its record");
                self.resolver
                    .resolve_for_shortening(parsed.as_str())
                    .await
                    .map_err(|e| storage_failure(raw_url, e))?
                    .ok_or_else(|| {
                        storage_failure(
                            raw_url,
                            StoreError::Persistence(
                                "record missing after duplicate url conflict".to_string(),
                            ),
                        )
                    })
            }
            Err(e) => Err(storage_failure(raw_url, e)),
        }
    }

    /// Resolves a reference token to the stored URL.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidReference`] if the token is not numeric
    /// - [`ResolveError::ReferenceNotFound`] if no record holds the reference
    /// - [`ResolveError::StorageFailure`] on persistence errors
    pub async fn resolve_redirect(&self, ref_text: &str) -> Result<String, ResolveError> {
        let short_ref = parse_reference(ref_text)?;

        let record = self
            .resolver
            .resolve_for_redirect(short_ref)
            .await
            .map_err(|e| {
                error!(short_ref, error = %e, "Reference lookup failed");
                ResolveError::StorageFailure(e)
            })?;

        match record {
            Some(record) => Ok(record.url),
            None => Err(ResolveError::ReferenceNotFound(short_ref.to_string())),
        }
    }

    /// Number of registered URLs.
    pub async fn registered_count(&self) -> Result<i64, StoreError> {
        self.repository.count().await
    }
}

fn storage_failure(url: &str, e: StoreError) -> ShortenError {
    error!(url, phase = "rejected", error = %e, "Storage failure while shortening");
    ShortenError::StorageFailure(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::validator::MockHostResolver;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Utc;
    use mockall::Sequence;
    use std::time::Duration;

    fn record(url: &str, short_ref: i64) -> UrlRecord {
        UrlRecord::new(url.to_string(), short_ref, Utc::now())
    }

    fn resolving_validator() -> UrlValidator {
        let mut resolver = MockHostResolver::new();
        resolver
            .expect_lookup()
            .returning(|_, _| Ok(vec!["10.0.0.1:443".parse().unwrap()]));
        UrlValidator::new(Arc::new(resolver), Duration::from_secs(1))
    }

    fn service(repo: MockUrlRepository) -> ShorteningService {
        ShorteningService::new(Arc::new(repo), resolving_validator())
    }

    #[tokio::test]
    async fn test_shorten_creates_new_record() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_create_next()
            .withf(|url| url == "https://www.example.com")
            .times(1)
            .returning(|url| Ok(record(url, 1)));

        let result = service(repo).shorten("https://www.example.com").await.unwrap();

        assert_eq!(result.url, "https://www.example.com");
        assert_eq!(result.short_ref, 1);
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_record() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_url()
            .times(1)
            .returning(|url| Ok(Some(record(url, 5))));
        repo.expect_create_next().times(0);

        let result = service(repo).shorten("https://example.com").await.unwrap();

        assert_eq!(result.short_ref, 5);
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url_without_touching_store() {
        let repo = MockUrlRepository::new();

        let result = service(repo).shorten("not a url").await;

        assert!(matches!(
            result,
            Err(ShortenError::InvalidUrl(ValidationError::MalformedUrl(_)))
        ));
    }

    #[tokio::test]
    async fn test_shorten_rejects_unsupported_scheme() {
        let result = service(MockUrlRepository::new()).shorten("ftp://host").await;

        assert!(matches!(
            result,
            Err(ShortenError::InvalidUrl(ValidationError::UnsupportedScheme(_)))
        ));
    }

    #[tokio::test]
    async fn test_shorten_recovers_from_duplicate_url_race() {
        let mut repo = MockUrlRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_create_next()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::DuplicateUrl));
        repo.expect_find_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|url| Ok(Some(record(url, 7))));

        let result = service(repo).shorten("https://race.example").await.unwrap();

        assert_eq!(result.short_ref, 7);
    }

    #[tokio::test]
    async fn test_shorten_duplicate_url_but_record_missing_is_storage_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_url().times(2).returning(|_| Ok(None));
        repo.expect_create_next()
            .times(1)
            .returning(|_| Err(StoreError::DuplicateUrl));

        let result = service(repo).shorten("https://race.example").await;

        assert!(matches!(
            result,
            Err(ShortenError::StorageFailure(StoreError::Persistence(_)))
        ));
    }

    #[tokio::test]
    async fn test_shorten_duplicate_ref_is_not_retried() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_create_next()
            .times(1)
            .returning(|_| Err(StoreError::DuplicateRef));

        let result = service(repo).shorten("https://example.com").await;

        assert_eq!(
            result.unwrap_err(),
            ShortenError::StorageFailure(StoreError::DuplicateRef)
        );
    }

    #[tokio::test]
    async fn test_shorten_lookup_failure_is_storage_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_url()
            .returning(|_| Err(StoreError::Persistence("timeout".to_string())));
        repo.expect_create_next().times(0);

        let result = service(repo).shorten("https://example.com").await;

        assert!(matches!(result, Err(ShortenError::StorageFailure(_))));
    }

    #[tokio::test]
    async fn test_resolve_redirect_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_ref()
            .withf(|short_ref| *short_ref == 2)
            .times(1)
            .returning(|r| Ok(Some(record("https://www.freecodecamp.org", r))));

        let url = service(repo).resolve_redirect("2").await.unwrap();

        assert_eq!(url, "https://www.freecodecamp.org");
    }

    #[tokio::test]
    async fn test_resolve_redirect_strips_leading_zeros() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_ref()
            .withf(|short_ref| *short_ref == 7)
            .times(1)
            .returning(|r| Ok(Some(record("https://example.com", r))));

        assert!(service(repo).resolve_redirect("007").await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_redirect_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_ref().returning(|_| Ok(None));

        let result = service(repo).resolve_redirect("999999").await;

        assert_eq!(
            result.unwrap_err(),
            ResolveError::ReferenceNotFound("999999".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_redirect_rejects_non_numeric() {
        let repo = MockUrlRepository::new();

        let result = service(repo).resolve_redirect("abc").await;

        assert_eq!(
            result.unwrap_err(),
            ResolveError::InvalidReference("abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_redirect_storage_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_ref()
            .returning(|_| Err(StoreError::Persistence("connection lost".to_string())));

        let result = service(repo).resolve_redirect("1").await;

        assert!(matches!(result, Err(ResolveError::StorageFailure(_))));
    }

    #[test]
    fn test_parse_reference_accepts_digits() {
        assert_eq!(parse_reference("1").unwrap(), 1);
        assert_eq!(parse_reference("42").unwrap(), 42);
        assert_eq!(parse_reference("0042").unwrap(), 42);
        assert_eq!(parse_reference("0").unwrap(), 0);
        assert_eq!(parse_reference("000").unwrap(), 0);
    }

    #[test]
    fn test_parse_reference_rejects_non_digits() {
        for token in ["", "abc", "1a", "a1", "-1", "+1", " 1", "1 ", "1.0", "1e3", "0x10"] {
            assert!(
                matches!(parse_reference(token), Err(ResolveError::InvalidReference(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_reference_overflow_is_not_found() {
        let result = parse_reference("00099999999999999999999");

        assert_eq!(
            result.unwrap_err(),
            ResolveError::ReferenceNotFound("99999999999999999999".to_string())
        );
    }
}
