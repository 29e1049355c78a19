//! Domain name helpers
//!
//! - [`to_ascii`]: Unicode → ASCII (punycode) domain encoding
//! - [`add_origin`] / [`trim_domain_name`]: convert between zone-relative and
//!   fully-qualified record names
//! - [`SuffixResolver`]: split a domain into the SLD/TLD pair registrar APIs
//!   address zones by

use crate::error::{Error, Result};
use std::fmt;
use tldextract::{TldExtractor, TldOption};

/// Encode a domain name as lower-case ASCII, converting Unicode labels to punycode.
///
/// A trailing dot is dropped.
pub fn to_ascii(domain: &str) -> Result<String> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(Error::invalid_input("Domain name cannot be empty"));
    }

    idna::domain_to_ascii(trimmed)
        .map_err(|e| Error::invalid_input(format!("Invalid domain name '{}': {}", domain, e)))
}

/// Qualify a zone-relative name with its origin.
///
/// `@` and the empty name denote the apex. Names ending in `.` are already
/// absolute and only lose the dot.
pub fn add_origin(name: &str, origin: &str) -> String {
    let origin = origin.trim_end_matches('.');
    match name {
        "" | "@" => origin.to_string(),
        n if n.ends_with('.') => n.trim_end_matches('.').to_string(),
        n if origin.is_empty() => n.to_string(),
        n => format!("{}.{}", n, origin),
    }
}

/// Express a fully-qualified name relative to `origin` (`@` for the apex).
///
/// Names outside the origin are returned unchanged.
pub fn trim_domain_name(fqdn: &str, origin: &str) -> String {
    let fqdn = fqdn.trim_end_matches('.');
    let origin = origin.trim_end_matches('.');

    if fqdn.eq_ignore_ascii_case(origin) {
        return "@".to_string();
    }

    let cut = fqdn.len().saturating_sub(origin.len() + 1);
    match fqdn.get(cut..) {
        Some(suffix)
            if fqdn.len() > origin.len() + 1
                && suffix.starts_with('.')
                && suffix[1..].eq_ignore_ascii_case(origin) =>
        {
            fqdn[..cut].to_string()
        }
        _ => fqdn.to_string(),
    }
}

/// A domain split into its second-level label and public suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    /// Second-level label, e.g. `example` for `www.example.co.uk`
    pub sld: String,
    /// Public suffix, e.g. `co.uk`
    pub tld: String,
}

impl fmt::Display for DomainParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sld, self.tld)
    }
}

/// Trait for public-suffix resolution
///
/// Registrar APIs commonly address a zone by `(sld, tld)` rather than by the
/// full domain string; implementations decide where the suffix boundary lies.
pub trait SuffixResolver: Send + Sync {
    /// Split `domain` into its SLD/TLD pair
    fn split(&self, domain: &str) -> Result<DomainParts>;
}

/// [`SuffixResolver`] backed by the Public Suffix List (via `tldextract`)
pub struct PublicSuffixResolver {
    extractor: TldExtractor,
}

impl PublicSuffixResolver {
    /// Create a resolver using the bundled suffix list
    pub fn new() -> Self {
        Self {
            extractor: TldExtractor::new(TldOption::default()),
        }
    }
}

impl Default for PublicSuffixResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PublicSuffixResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicSuffixResolver").finish_non_exhaustive()
    }
}

impl SuffixResolver for PublicSuffixResolver {
    fn split(&self, domain: &str) -> Result<DomainParts> {
        let domain = domain.trim_end_matches('.');
        let result = self
            .extractor
            .extract(&format!("http://{}/", domain))
            .map_err(|e| Error::invalid_input(format!("Cannot split domain '{}': {}", domain, e)))?;

        match (result.domain, result.suffix) {
            (Some(sld), Some(tld)) if !sld.is_empty() && !tld.is_empty() => {
                Ok(DomainParts { sld, tld })
            }
            _ => Err(Error::invalid_input(format!(
                "Domain '{}' has no registrable part below a public suffix",
                domain
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_origin() {
        assert_eq!(add_origin("@", "example.com"), "example.com");
        assert_eq!(add_origin("", "example.com"), "example.com");
        assert_eq!(add_origin("www", "example.com"), "www.example.com");
        assert_eq!(add_origin("mail.example.net.", "example.com"), "mail.example.net");
        assert_eq!(add_origin("www", "example.com."), "www.example.com");
    }

    #[test]
    fn test_trim_domain_name() {
        assert_eq!(trim_domain_name("example.com", "example.com"), "@");
        assert_eq!(trim_domain_name("www.example.com", "example.com"), "www");
        assert_eq!(trim_domain_name("a.b.example.com.", "example.com"), "a.b");
        assert_eq!(trim_domain_name("WWW.Example.com", "example.com"), "WWW");
        // not inside the origin
        assert_eq!(trim_domain_name("www.otherexample.com", "example.com"), "www.otherexample.com");
        assert_eq!(trim_domain_name("example.org", "example.com"), "example.org");
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(to_ascii("Example.COM").unwrap(), "example.com");
        assert_eq!(to_ascii("example.com.").unwrap(), "example.com");
        assert_eq!(to_ascii("münchen.de").unwrap(), "xn--mnchen-3ya.de");
        assert!(to_ascii("  ").is_err());
    }

    #[test]
    fn test_public_suffix_split() {
        let resolver = PublicSuffixResolver::new();

        let parts = resolver.split("example.com").unwrap();
        assert_eq!(parts.sld, "example");
        assert_eq!(parts.tld, "com");

        let parts = resolver.split("example.co.uk").unwrap();
        assert_eq!(parts.sld, "example");
        assert_eq!(parts.tld, "co.uk");
        assert_eq!(parts.to_string(), "example.co.uk");
    }
}
