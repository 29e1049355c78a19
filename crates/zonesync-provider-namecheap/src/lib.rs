// # Namecheap Provider
//
// This crate provides the Namecheap adapter for zonesync. Namecheap acts as
// both a DNS service provider (zone records) and a registrar (delegation).
//
// ## Behaviour
//
// - Zone writes are full replacements: one `setHosts` call carries the whole
//   desired record set
// - Remote SOA records are never compared
// - Apex NS records are never managed (basic DNS does not allow it)
// - The parking placeholder Namecheap injects into empty zones counts as empty
// - SRV, PTR, CAA, TLSA and ALIAS records are rejected; URL, URL301 and FRAME
//   are Namecheap's own types and pass through
// - "Too many requests" responses are retried with a fixed backoff
//
// ## Security Requirements
//
// - API key NEVER appears in logs
// - Provider MUST fail fast if user or key is empty
//
// ## Usage
//
// ```rust,ignore
// use std::sync::Arc;
// use zonesync_provider_namecheap::{InMemoryNamecheap, NamecheapProvider};
//
// let api = Arc::new(InMemoryNamecheap::new().with_zone("example.com", vec![]));
// let provider = NamecheapProvider::new(api);
// let corrections = provider.get_domain_corrections(&desired).await?;
// ```

pub mod api;
pub mod memory;
pub mod normalize;

pub use api::{
    classify_api_error, DomainInfo, HostRecord, NamecheapApi, NamecheapConnector,
    NamecheapCredentials, DEFAULT_NAMESERVERS,
};
pub use memory::{InMemoryConnector, InMemoryNamecheap};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use zonesync_core::config::ProviderConfig;
use zonesync_core::models::{downcase, Correction, CorrectionAction, DomainConfig, Nameserver};
use zonesync_core::names::{to_ascii, DomainParts, PublicSuffixResolver, SuffixResolver};
use zonesync_core::traits::{
    CorrectionExecutor, Differ, DnsServiceProvider, DnsServiceProviderFactory, Registrar,
    RegistrarFactory,
};
use zonesync_core::{Error, KeyedDiffer, ProviderRegistry, RecordConfig, Result, RetryPolicy};

use normalize::{
    hosts_to_records, is_parking_placeholder, join_nameservers, records_to_hosts,
    sorted_nameservers, strip_apex_nameservers,
};

/// Provider type name used in configuration and the registry
pub const PROVIDER_NAME: &str = "namecheap";

/// Record types only Namecheap understands
pub const CUSTOM_RECORD_TYPES: [&str; 3] = ["URL", "URL301", "FRAME"];

/// Standard record types the Namecheap API can neither read nor write
pub const UNSUPPORTED_RECORD_TYPES: [&str; 5] = ["SRV", "PTR", "CAA", "TLSA", "ALIAS"];

/// Namecheap DNS provider and registrar
///
/// # State
///
/// Holds no cached zone data: every comparison fetches the live state.
pub struct NamecheapProvider {
    /// API client
    api: Arc<dyn NamecheapApi>,

    /// SLD/TLD splitter
    resolver: Arc<dyn SuffixResolver>,

    /// Record diff implementation
    differ: Arc<dyn Differ>,

    /// Retry for rate-limited calls
    retry: RetryPolicy,

    /// Nameservers of Namecheap's own DNS
    default_nameservers: Vec<String>,
}

impl fmt::Debug for NamecheapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamecheapProvider")
            .field("retry", &self.retry)
            .field("default_nameservers", &self.default_nameservers)
            .finish_non_exhaustive()
    }
}

impl NamecheapProvider {
    /// Create a provider with the Public Suffix List resolver, the keyed
    /// differ, the default retry policy and Namecheap's default nameservers
    pub fn new(api: Arc<dyn NamecheapApi>) -> Self {
        Self {
            api,
            resolver: Arc::new(PublicSuffixResolver::new()),
            differ: Arc::new(KeyedDiffer::new()),
            retry: RetryPolicy::default(),
            default_nameservers: DEFAULT_NAMESERVERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the SLD/TLD splitter
    pub fn with_suffix_resolver(mut self, resolver: Arc<dyn SuffixResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the record differ
    pub fn with_differ(mut self, differ: Arc<dyn Differ>) -> Self {
        self.differ = differ;
        self
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the registrar's default nameservers
    pub fn with_default_nameservers(mut self, nameservers: Vec<String>) -> Self {
        self.default_nameservers = nameservers;
        self
    }

    fn split(&self, domain: &str) -> Result<DomainParts> {
        self.resolver.split(domain)
    }

    /// Write the complete record set of a zone
    async fn replace_records(&self, domain: &str, records: &[RecordConfig]) -> Result<()> {
        let parts = self.split(domain)?;
        let hosts = records_to_hosts(records, domain);

        info!("Writing {} hosts to {}", hosts.len(), domain);
        self.retry
            .run(|| self.api.set_hosts(&parts.sld, &parts.tld, &hosts))
            .await
    }

    /// Delegate a domain to custom nameservers
    async fn set_nameservers(&self, domain: &str, nameservers: &[String]) -> Result<()> {
        let parts = self.split(domain)?;
        let joined = nameservers.join(",");

        info!("Setting nameservers of {} to {}", domain, joined);
        self.retry
            .run(|| {
                self.api
                    .set_custom_nameservers(&parts.sld, &parts.tld, &joined)
            })
            .await
    }
}

#[async_trait]
impl CorrectionExecutor for NamecheapProvider {
    async fn execute_correction(&self, correction: &Correction) -> Result<()> {
        match &correction.action {
            CorrectionAction::ReplaceRecords { domain, records } => {
                self.replace_records(domain, records).await
            }
            CorrectionAction::SetNameservers {
                domain,
                nameservers,
            } => self.set_nameservers(domain, nameservers).await,
        }
    }
}

#[async_trait]
impl DnsServiceProvider for NamecheapProvider {
    async fn get_domain_corrections(&self, desired: &DomainConfig) -> Result<Vec<Correction>> {
        check_record_types(&desired.records)?;

        let mut dc = desired.clone();
        dc.punycode()?;
        strip_apex_nameservers(&mut dc, &self.default_nameservers);

        let parts = self.split(&dc.name)?;
        let hosts = self
            .retry
            .run(|| self.api.get_hosts(&parts.sld, &parts.tld))
            .await?;
        debug!("Fetched {} hosts for {}", hosts.len(), dc.name);

        if is_parking_placeholder(&dc.records, &hosts) {
            debug!("{} only holds the parking placeholder", dc.name);
            return Ok(Vec::new());
        }

        let actual = hosts_to_records(&hosts, &dc.name)?;
        downcase(&mut dc.records);

        let changes = self.differ.incremental_diff(&dc.records, &actual);
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let mut description = format!("GENERATE_ZONE: {} ({} records)", dc.name, dc.records.len());
        for line in changes.describe() {
            description.push('\n');
            description.push_str(&line);
        }

        Ok(vec![Correction::new(
            description,
            CorrectionAction::ReplaceRecords {
                domain: dc.name,
                records: dc.records,
            },
        )])
    }

    async fn get_nameservers(&self, _domain: &str) -> Result<Vec<Nameserver>> {
        Ok(Nameserver::from_names(self.default_nameservers.iter().cloned()))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl Registrar for NamecheapProvider {
    async fn get_registrar_corrections(&self, desired: &DomainConfig) -> Result<Vec<Correction>> {
        let domain = to_ascii(&desired.name)?;
        let info = self
            .retry
            .run(|| self.api.get_domain_info(&domain))
            .await?;

        let found = join_nameservers(&info.nameservers);
        let wanted = sorted_nameservers(desired.nameserver_names());
        let joined = wanted.join(",");

        if found == joined {
            debug!("Delegation of {} is up to date", domain);
            return Ok(Vec::new());
        }

        Ok(vec![Correction::new(
            format!("Change Nameservers from '{}' to '{}'", found, joined),
            CorrectionAction::SetNameservers {
                domain,
                nameservers: wanted,
            },
        )])
    }

    fn registrar_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Namecheap providers and registrars from configuration
pub struct NamecheapFactory {
    connector: Arc<dyn NamecheapConnector>,
}

impl NamecheapFactory {
    /// Create a factory that obtains API handles from `connector`
    pub fn new(connector: Arc<dyn NamecheapConnector>) -> Self {
        Self { connector }
    }

    /// Validate credentials, then connect
    fn build(&self, config: &ProviderConfig) -> Result<NamecheapProvider> {
        let (credentials, retry) = NamecheapCredentials::from_config(config)?;
        let api = self.connector.connect(&credentials)?;
        Ok(NamecheapProvider::new(api).with_retry_policy(retry))
    }
}

impl DnsServiceProviderFactory for NamecheapFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsServiceProvider>> {
        Ok(Box::new(self.build(config)?))
    }
}

impl RegistrarFactory for NamecheapFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn Registrar>> {
        Ok(Box::new(self.build(config)?))
    }
}

/// Register the Namecheap provider and registrar with a registry
///
/// # Example
///
/// ```rust,ignore
/// let registry = ProviderRegistry::new();
/// zonesync_provider_namecheap::register(&registry, connector);
/// ```
pub fn register(registry: &ProviderRegistry, connector: Arc<dyn NamecheapConnector>) {
    registry.register_dns_provider(
        PROVIDER_NAME,
        Box::new(NamecheapFactory::new(Arc::clone(&connector))),
    );
    registry.register_registrar(PROVIDER_NAME, Box::new(NamecheapFactory::new(connector)));
}

/// Whether a record type is one of Namecheap's custom types
pub fn is_custom_record_type(record_type: &str) -> bool {
    CUSTOM_RECORD_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(record_type))
}

/// Reject desired records Namecheap cannot manage
///
/// # Errors
///
/// `Error::InvalidInput` naming the first record of an unsupported type
pub fn check_record_types(records: &[RecordConfig]) -> Result<()> {
    for record in records {
        if is_custom_record_type(&record.record_type) {
            debug!(
                "{} is a Namecheap {} record",
                record.name_fqdn,
                record.record_type.to_ascii_uppercase()
            );
            continue;
        }
        if UNSUPPORTED_RECORD_TYPES.iter().any(|t| record.is_type(t)) {
            return Err(Error::invalid_input(format!(
                "Namecheap does not support {} records ({})",
                record.record_type.to_ascii_uppercase(),
                record.name_fqdn
            )));
        }
    }
    Ok(())
}
