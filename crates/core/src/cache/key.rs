//! Resource keys and URL canonicalization.
//!
//! Two spellings of the same remote address must land on the same cache
//! slot, so keys are only ever built from a canonical URL.

use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

use crate::Error;

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

/// Canonicalize a URL string for consistent caching.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_lowercase();
        parsed
            .set_host(Some(&lowered))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Opaque identifier of a remote resource, in canonical URL form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Build a key from any spelling of a remote address.
    pub fn parse(input: &str) -> Result<Self, Error> {
        Ok(Self::from(canonicalize(input)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 prefix of the key, for log fields.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..12].to_string()
    }
}

impl From<Url> for ResourceKey {
    fn from(url: Url) -> Self {
        Self(url.into())
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("avatars.example.com/u/1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("avatars.example.com"));
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://AVATARS.Example.COM/u/1").unwrap();
        assert_eq!(url.host_str(), Some("avatars.example.com"));
    }

    #[test]
    fn test_canonicalize_remove_fragment_keep_query() {
        let url = canonicalize("https://example.com/u/1?v=4&s=40#top").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("v=4&s=40"));
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_equivalent_spellings_share_a_key() {
        let a = ResourceKey::parse("https://Avatars.Example.com/u/1?v=4").unwrap();
        let b = ResourceKey::parse("  avatars.example.com/u/1?v=4#frag ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://avatars.example.com/u/1?v=4");
    }

    #[test]
    fn test_query_order_is_significant() {
        let a = ResourceKey::parse("https://example.com/u/1?a=1&b=2").unwrap();
        let b = ResourceKey::parse("https://example.com/u/1?b=2&a=1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let err = ResourceKey::parse("ftp://example.com/file").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_fingerprint_stability() {
        let key = ResourceKey::parse("https://example.com/u/1").unwrap();
        assert_eq!(key.fingerprint(), key.clone().fingerprint());
        assert_eq!(key.fingerprint().len(), 12);
        assert!(key.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));

        let other = ResourceKey::parse("https://example.com/u/2").unwrap();
        assert_ne!(key.fingerprint(), other.fingerprint());
    }
}
