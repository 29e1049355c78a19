//! In-memory Namecheap simulation
//!
//! [`InMemoryNamecheap`] keeps zones and delegations in memory and mimics the
//! registrar behaviour the adapter depends on:
//!
//! - Setting a zone to zero hosts leaves the two-record parking placeholder
//! - Stored hosts get fresh remote ids on every write
//! - Rate-limit failures can be injected for the next N calls
//!
//! Useful for tests and for previewing corrections without an account.

use crate::api::{
    classify_api_error, DomainInfo, HostRecord, NamecheapApi, NamecheapConnector,
    NamecheapCredentials, DEFAULT_NAMESERVERS, ERR_TOO_MANY_REQUESTS,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use zonesync_core::{Error, Result};

/// "Domain not found"
const ERR_DOMAIN_NOT_FOUND: u32 = 2_019_166;

#[derive(Debug, Default)]
struct Zone {
    hosts: Vec<HostRecord>,
    nameservers: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by ASCII domain name
    zones: HashMap<String, Zone>,
    next_host_id: u64,
    /// Permanent failure returned by every call, as (code, message)
    failure: Option<(u32, String)>,
}

/// Namecheap API simulation backed by memory
#[derive(Debug, Default)]
pub struct InMemoryNamecheap {
    state: Mutex<State>,
    rate_limited_calls: AtomicUsize,
    get_hosts_calls: AtomicUsize,
    set_hosts_calls: AtomicUsize,
    get_info_calls: AtomicUsize,
    set_nameservers_calls: AtomicUsize,
}

impl InMemoryNamecheap {
    /// Create an empty simulation
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain delegated to the default nameservers with the given hosts
    pub fn with_zone(self, domain: &str, hosts: Vec<HostRecord>) -> Self {
        self.put_zone(domain, hosts);
        self
    }

    /// Register (or overwrite) a domain's hosts, leaving its delegation alone
    pub fn put_zone(&self, domain: &str, hosts: Vec<HostRecord>) {
        let mut state = self.lock();
        let hosts = stamp(&mut state, domain, hosts);
        let zone = state.zones.entry(domain.to_lowercase()).or_insert_with(|| Zone {
            hosts: Vec::new(),
            nameservers: DEFAULT_NAMESERVERS.iter().map(|s| s.to_string()).collect(),
        });
        zone.hosts = hosts;
    }

    /// Overwrite a domain's delegation
    ///
    /// An unknown domain is registered with the parking placeholder as its
    /// hosts.
    pub fn put_nameservers(&self, domain: &str, nameservers: &[&str]) {
        let mut state = self.lock();
        let key = domain.to_lowercase();
        if !state.zones.contains_key(&key) {
            let hosts = stamp(&mut state, &key, Vec::new());
            state.zones.insert(
                key.clone(),
                Zone {
                    hosts,
                    nameservers: Vec::new(),
                },
            );
        }
        if let Some(zone) = state.zones.get_mut(&key) {
            zone.nameservers = nameservers.iter().map(|s| s.to_string()).collect();
        }
    }

    /// Current hosts of a domain (empty when unknown)
    pub fn hosts(&self, domain: &str) -> Vec<HostRecord> {
        self.lock()
            .zones
            .get(&domain.to_lowercase())
            .map(|z| z.hosts.clone())
            .unwrap_or_default()
    }

    /// Current delegation of a domain (empty when unknown)
    pub fn nameservers(&self, domain: &str) -> Vec<String> {
        self.lock()
            .zones
            .get(&domain.to_lowercase())
            .map(|z| z.nameservers.clone())
            .unwrap_or_default()
    }

    /// Fail the next `calls` API calls with "Too many requests"
    pub fn rate_limit_next(&self, calls: usize) {
        self.rate_limited_calls.store(calls, Ordering::SeqCst);
    }

    /// Fail every API call with the given error response
    pub fn fail_with(&self, code: u32, message: &str) {
        self.lock().failure = Some((code, message.to_string()));
    }

    /// Stop failing calls
    pub fn clear_failure(&self) {
        self.lock().failure = None;
        self.rate_limited_calls.store(0, Ordering::SeqCst);
    }

    /// Number of `get_hosts` calls made, including failed ones
    pub fn get_hosts_calls(&self) -> usize {
        self.get_hosts_calls.load(Ordering::SeqCst)
    }

    /// Number of `set_hosts` calls made, including failed ones
    pub fn set_hosts_calls(&self) -> usize {
        self.set_hosts_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_domain_info` calls made, including failed ones
    pub fn get_info_calls(&self) -> usize {
        self.get_info_calls.load(Ordering::SeqCst)
    }

    /// Number of `set_custom_nameservers` calls made, including failed ones
    pub fn set_nameservers_calls(&self) -> usize {
        self.set_nameservers_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply injected failures, counting the call first
    fn enter(&self, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);

        let rate_limited = self
            .rate_limited_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rate_limited {
            return Err(classify_api_error(ERR_TOO_MANY_REQUESTS, "Too many requests"));
        }

        match &self.lock().failure {
            Some((code, message)) => Err(classify_api_error(*code, message)),
            None => Ok(()),
        }
    }
}

/// Assign fresh remote ids; an empty set becomes the parking placeholder
fn stamp(state: &mut State, domain: &str, hosts: Vec<HostRecord>) -> Vec<HostRecord> {
    let hosts = if hosts.is_empty() {
        parking_placeholder(domain)
    } else {
        hosts
    };

    hosts
        .into_iter()
        .map(|mut host| {
            state.next_host_id += 1;
            host.host_id = state.next_host_id;
            host
        })
        .collect()
}

fn parking_placeholder(domain: &str) -> Vec<HostRecord> {
    vec![
        HostRecord::new("www", "CNAME", "parkingpage.namecheap.com.", 1800),
        HostRecord::new("@", "URL", format!("http://www.{}/?from=@", domain), 1800),
    ]
}

fn zone_key(sld: &str, tld: &str) -> String {
    format!("{}.{}", sld, tld).to_lowercase()
}

fn domain_not_found(domain: &str) -> Error {
    classify_api_error(
        ERR_DOMAIN_NOT_FOUND,
        &format!("Domain name not found ({})", domain),
    )
}

#[async_trait]
impl NamecheapApi for InMemoryNamecheap {
    async fn get_hosts(&self, sld: &str, tld: &str) -> Result<Vec<HostRecord>> {
        self.enter(&self.get_hosts_calls)?;
        let key = zone_key(sld, tld);

        self.lock()
            .zones
            .get(&key)
            .map(|z| z.hosts.clone())
            .ok_or_else(|| domain_not_found(&key))
    }

    async fn set_hosts(&self, sld: &str, tld: &str, hosts: &[HostRecord]) -> Result<()> {
        self.enter(&self.set_hosts_calls)?;
        let key = zone_key(sld, tld);

        let mut state = self.lock();
        if !state.zones.contains_key(&key) {
            return Err(domain_not_found(&key));
        }
        let stamped = stamp(&mut state, &key, hosts.to_vec());
        debug!("Stored {} hosts for {}", stamped.len(), key);
        if let Some(zone) = state.zones.get_mut(&key) {
            zone.hosts = stamped;
        }
        Ok(())
    }

    async fn get_domain_info(&self, domain: &str) -> Result<DomainInfo> {
        self.enter(&self.get_info_calls)?;
        let key = domain.to_lowercase();

        let state = self.lock();
        let zone = state.zones.get(&key).ok_or_else(|| domain_not_found(&key))?;

        Ok(DomainInfo {
            domain: key.clone(),
            nameservers: zone.nameservers.clone(),
        })
    }

    async fn set_custom_nameservers(&self, sld: &str, tld: &str, nameservers: &str) -> Result<()> {
        self.enter(&self.set_nameservers_calls)?;
        let key = zone_key(sld, tld);

        let mut state = self.lock();
        let zone = state
            .zones
            .get_mut(&key)
            .ok_or_else(|| domain_not_found(&key))?;
        zone.nameservers = nameservers
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Ok(())
    }
}

/// Connector handing out one shared [`InMemoryNamecheap`]
#[derive(Debug, Clone)]
pub struct InMemoryConnector {
    api: Arc<InMemoryNamecheap>,
}

impl InMemoryConnector {
    /// Create a connector sharing `api`
    pub fn new(api: Arc<InMemoryNamecheap>) -> Self {
        Self { api }
    }
}

impl NamecheapConnector for InMemoryConnector {
    fn connect(&self, credentials: &NamecheapCredentials) -> Result<Arc<dyn NamecheapApi>> {
        debug!("Connecting in-memory Namecheap as {}", credentials.api_user);
        Ok(self.api.clone())
    }
}
