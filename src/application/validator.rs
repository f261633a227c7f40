//! Validation of candidate URLs before they are registered.
//!
//! A URL is accepted when it parses as an absolute URL, its scheme starts
//! with `http`, and its host resolves to at least one address. Resolution is
//! a reachability heuristic only; no content is fetched.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::{Host, Url};

/// Reasons a candidate URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed url: {0}")]
    MalformedUrl(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("host {0} could not be resolved")]
    UnresolvableHost(String),
}

/// Name lookup used to check that a URL's host exists.
///
/// # Implementations
///
/// - [`TokioHostResolver`] - system resolver via [`tokio::net::lookup_host`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolves `host` to socket addresses. An empty result means the name
    /// exists but has no addresses.
    async fn lookup(&self, host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>>;
}

/// Resolver backed by the operating system's name service.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioHostResolver;

#[async_trait]
impl HostResolver for TokioHostResolver {
    async fn lookup(&self, host: &str, port: u16) -> std::io::Result<Vec<SocketAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(addrs.collect())
    }
}

/// A URL that passed validation.
///
/// Keeps the submitted text untouched: records are keyed by the exact
/// string the caller sent, not by the parser's normalized form.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    raw: String,
}

impl ParsedUrl {
    /// The URL exactly as submitted.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Longest accepted URL, in bytes. Keeps the `url` unique index entry
/// well under PostgreSQL's btree row limit whatever the character mix.
pub const MAX_URL_BYTES: usize = 2048;

/// True when the URL parser would silently drop characters from `candidate`:
/// tabs and newlines anywhere, or C0 controls and spaces at either end.
/// Such text parses, but cannot be sent back in a `Location` header.
fn has_stripped_characters(candidate: &str) -> bool {
    candidate.contains(['\t', '\n', '\r'])
        || candidate.trim_matches(|c: char| c <= ' ') != candidate
}

/// Checks candidate URLs for syntax, scheme, and a resolvable host.
#[derive(Clone)]
pub struct UrlValidator {
    resolver: Arc<dyn HostResolver>,
    lookup_timeout: Duration,
}

impl UrlValidator {
    /// Default deadline for a single host lookup.
    pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a validator using `resolver` for host lookups.
    pub fn new(resolver: Arc<dyn HostResolver>, lookup_timeout: Duration) -> Self {
        Self {
            resolver,
            lookup_timeout,
        }
    }

    /// Validates `candidate`.
    ///
    /// # Check Order
    ///
    /// 1. At most [`MAX_URL_BYTES`] bytes, then parse as an absolute URL,
    ///    else [`ValidationError::MalformedUrl`].
    ///    Text the parser would alter by dropping whitespace or control
    ///    characters is malformed too.
    /// 2. Scheme must start with `http`, else [`ValidationError::UnsupportedScheme`]
    /// 3. A host must be present, else [`ValidationError::MalformedUrl`]
    /// 4. Domain hosts must resolve to at least one address within the lookup
    ///    deadline, else [`ValidationError::UnresolvableHost`]. IP literals
    ///    need no lookup.
    ///
    /// Lookup failures and timeouts are ordinary rejections, never errors
    /// for the caller to escalate.
    pub async fn validate(&self, candidate: &str) -> Result<ParsedUrl, ValidationError> {
        if candidate.len() > MAX_URL_BYTES {
            return Err(ValidationError::MalformedUrl(format!(
                "longer than {MAX_URL_BYTES} bytes"
            )));
        }

        if has_stripped_characters(candidate) {
            return Err(ValidationError::MalformedUrl(
                "contains whitespace or control characters".to_string(),
            ));
        }

        let url =
            Url::parse(candidate).map_err(|e| ValidationError::MalformedUrl(e.to_string()))?;

        if !url.scheme().starts_with("http") {
            return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
                return Ok(ParsedUrl {
                    raw: candidate.to_string(),
                });
            }
            _ => return Err(ValidationError::MalformedUrl("missing host".to_string())),
        };

        let port = url.port_or_known_default().unwrap_or(80);
        self.ensure_resolvable(&host, port).await?;

        Ok(ParsedUrl {
            raw: candidate.to_string(),
        })
    }

    async fn ensure_resolvable(&self, host: &str, port: u16) -> Result<(), ValidationError> {
        let lookup = tokio::time::timeout(self.lookup_timeout, self.resolver.lookup(host, port));

        match lookup.await {
            Ok(Ok(addrs)) if !addrs.is_empty() => {
                debug!(host, addresses = addrs.len(), "Host resolved");
                Ok(())
            }
            Ok(Ok(_)) => {
                debug!(host, "Host resolved to no addresses");
                Err(ValidationError::UnresolvableHost(host.to_string()))
            }
            Ok(Err(e)) => {
                debug!(host, error = %e, "Host lookup failed");
                Err(ValidationError::UnresolvableHost(host.to_string()))
            }
            Err(_) => {
                warn!(
                    host,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Host lookup timed out"
                );
                Err(ValidationError::UnresolvableHost(host.to_string()))
            }
        }
    }
}
