//! Common utilities for Namecheap contract tests
//!
//! Providers built here use a zero-backoff retry policy and a suffix resolver
//! that splits on the last label, so tests never sleep or depend on the
//! Public Suffix List.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use zonesync_core::error::{Error, Result};
use zonesync_core::models::{DomainConfig, RecordConfig};
use zonesync_core::names::{DomainParts, SuffixResolver};
use zonesync_core::RetryPolicy;
use zonesync_provider_namecheap::{HostRecord, InMemoryNamecheap, NamecheapProvider};

pub const DOMAIN: &str = "example.com";

/// Splits `a.b.c` into `("b", "c")`
pub struct LastLabelResolver;

impl SuffixResolver for LastLabelResolver {
    fn split(&self, domain: &str) -> Result<DomainParts> {
        let domain = domain.trim_end_matches('.');
        let (rest, tld) = domain
            .rsplit_once('.')
            .ok_or_else(|| Error::invalid_input(format!("no suffix in {}", domain)))?;
        let sld = rest.rsplit('.').next().unwrap_or(rest);
        Ok(DomainParts {
            sld: sld.to_string(),
            tld: tld.to_string(),
        })
    }
}

/// A provider over `api` with `max_attempts` zero-backoff attempts
pub fn provider_with_attempts(api: &Arc<InMemoryNamecheap>, max_attempts: usize) -> NamecheapProvider {
    NamecheapProvider::new(api.clone())
        .with_suffix_resolver(Arc::new(LastLabelResolver))
        .with_retry_policy(RetryPolicy::new(max_attempts, Duration::ZERO))
}

/// A provider over `api` with the default attempt count and no backoff
pub fn provider(api: &Arc<InMemoryNamecheap>) -> NamecheapProvider {
    provider_with_attempts(api, RetryPolicy::default().max_attempts)
}

/// An in-memory registrar holding one zone
pub fn api_with_zone(hosts: Vec<HostRecord>) -> Arc<InMemoryNamecheap> {
    Arc::new(InMemoryNamecheap::new().with_zone(DOMAIN, hosts))
}

/// A desired record in the test domain
pub fn record(record_type: &str, name: &str, target: &str) -> RecordConfig {
    RecordConfig::new(record_type, name, target, DOMAIN)
}

/// A desired domain holding `records`
pub fn desired(records: Vec<RecordConfig>) -> DomainConfig {
    let mut dc = DomainConfig::new(DOMAIN);
    dc.records = records;
    dc
}
