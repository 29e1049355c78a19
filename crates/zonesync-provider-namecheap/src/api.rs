// # Namecheap API Contract
//
// The subset of the Namecheap API the adapter drives, expressed as an async
// trait so the wire client stays outside this crate. Zones are addressed by
// `(sld, tld)`; domain info is addressed by the full ASCII domain.
//
// ## API Reference
//
// - `namecheap.domains.dns.getHosts` / `setHosts`
// - `namecheap.domains.getInfo`
// - `namecheap.domains.dns.setCustom`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use zonesync_core::config::ProviderConfig;
use zonesync_core::{Error, Result, RetryPolicy};

/// Production API endpoint
pub const DEFAULT_API_URL: &str = "https://api.namecheap.com/xml.response";

/// Nameservers of Namecheap's basic DNS product
pub const DEFAULT_NAMESERVERS: [&str; 2] =
    ["dns1.registrar-servers.com", "dns2.registrar-servers.com"];

/// "Too many requests"
pub const ERR_TOO_MANY_REQUESTS: u32 = 500_000;

/// API key / user / whitelisted IP rejected
const AUTH_ERROR_CODES: [u32; 3] = [1_011_102, 1_011_150, 1_010_101];

/// Domain not found or not associated with the account
const NOT_FOUND_ERROR_CODES: [u32; 2] = [2_019_166, 2_016_166];

/// One host record as the API reports or accepts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Remote identifier; local and sequential when sent by the adapter
    #[serde(rename = "HostId")]
    pub host_id: u64,

    /// Zone-relative name (`@` for the apex)
    #[serde(rename = "Name")]
    pub name: String,

    /// Record type, including Namecheap's URL, URL301 and FRAME types
    #[serde(rename = "Type")]
    pub record_type: String,

    /// Record target
    #[serde(rename = "Address")]
    pub address: String,

    /// MX preference
    #[serde(rename = "MXPref", default)]
    pub mx_pref: u16,

    /// TTL in seconds
    #[serde(rename = "TTL")]
    pub ttl: u32,
}

impl HostRecord {
    /// Create a host record with no remote identifier
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        address: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            host_id: 0,
            name: name.into(),
            record_type: record_type.into(),
            address: address.into(),
            mx_pref: 0,
            ttl,
        }
    }

    /// Set the MX preference
    pub fn with_mx_pref(mut self, mx_pref: u16) -> Self {
        self.mx_pref = mx_pref;
        self
    }
}

/// Registration details for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    /// ASCII domain name
    pub domain: String,

    /// Current delegation, in the order the API returned it
    pub nameservers: Vec<String>,
}

/// Trait for Namecheap API clients
///
/// Implementations translate API error responses with [`classify_api_error`]
/// so callers can tell rate limiting apart from every other failure.
#[async_trait]
pub trait NamecheapApi: Send + Sync {
    /// List the zone's host records
    async fn get_hosts(&self, sld: &str, tld: &str) -> Result<Vec<HostRecord>>;

    /// Replace the zone's entire host record set
    async fn set_hosts(&self, sld: &str, tld: &str, hosts: &[HostRecord]) -> Result<()>;

    /// Fetch registration details
    async fn get_domain_info(&self, domain: &str) -> Result<DomainInfo>;

    /// Delegate the domain to a comma-separated nameserver list
    async fn set_custom_nameservers(&self, sld: &str, tld: &str, nameservers: &str) -> Result<()>;
}

/// Map a Namecheap API error response to an [`Error`]
///
/// # Parameters
///
/// - `code`: Numeric error code from the response
/// - `message`: Error text from the response
pub fn classify_api_error(code: u32, message: &str) -> Error {
    let text = format!("Error {}: {}", code, message);
    match code {
        ERR_TOO_MANY_REQUESTS => Error::rate_limited(text),
        c if AUTH_ERROR_CODES.contains(&c) => Error::auth(text),
        c if NOT_FOUND_ERROR_CODES.contains(&c) => Error::not_found(text),
        _ => Error::provider("namecheap", text),
    }
}

/// Validated API credentials
#[derive(Clone)]
pub struct NamecheapCredentials {
    /// API user name
    pub api_user: String,

    /// API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// API endpoint
    pub base_url: String,
}

impl NamecheapCredentials {
    /// Extract credentials and retry policy from a provider configuration
    ///
    /// # Returns
    ///
    /// - `Ok((credentials, policy))`: For a valid `namecheap` configuration
    /// - `Err(Error::Config)`: For missing credentials or another provider type
    pub fn from_config(config: &ProviderConfig) -> Result<(Self, RetryPolicy)> {
        config.validate()?;

        match config {
            ProviderConfig::Namecheap {
                api_user,
                api_key,
                base_url,
                retry,
            } => Ok((
                Self {
                    api_user: api_user.clone(),
                    api_key: api_key.clone(),
                    base_url: base_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                },
                RetryPolicy::from(retry),
            )),
            other => Err(Error::config(format!(
                "Invalid config type for Namecheap provider: {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Debug for NamecheapCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamecheapCredentials")
            .field("api_user", &self.api_user)
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builds API handles from validated credentials
///
/// The factory calls this only after credentials have been validated, so a
/// connector never sees an empty user or key.
pub trait NamecheapConnector: Send + Sync {
    /// Create an API handle
    fn connect(&self, credentials: &NamecheapCredentials) -> Result<Arc<dyn NamecheapApi>>;
}
