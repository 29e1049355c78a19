//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles return scripted corrections and count every call, so tests can
//! assert what the reconciler asked for and what it executed.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonesync_core::config::{ProviderConfig, ReconcileConfig, RunMode};
use zonesync_core::error::{Error, Result};
use zonesync_core::models::{Correction, CorrectionAction, DomainConfig, Nameserver};
use zonesync_core::traits::{CorrectionExecutor, DnsServiceProvider, Registrar};

/// A mock DnsServiceProvider returning one zone correction per configured domain
pub struct MockDnsProvider {
    /// Domains reported as out of sync
    dirty: Arc<Mutex<HashSet<String>>>,
    /// Domains whose fetch fails
    broken: Arc<Mutex<HashSet<String>>>,
    /// Whether execute_correction fails
    fail_execute: bool,
    /// Call counter for get_domain_corrections()
    fetch_call_count: Arc<AtomicUsize>,
    /// Call counter for execute_correction()
    execute_call_count: Arc<AtomicUsize>,
    /// Recorded descriptions from execute calls
    executed: Arc<Mutex<Vec<String>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            dirty: Arc::new(Mutex::new(HashSet::new())),
            broken: Arc::new(Mutex::new(HashSet::new())),
            fail_execute: false,
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            execute_call_count: Arc::new(AtomicUsize::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report `domain` as needing a correction
    pub fn with_dirty(self, domain: &str) -> Self {
        self.dirty.lock().unwrap().insert(domain.to_string());
        self
    }

    /// Make fetching `domain` fail
    pub fn with_broken(self, domain: &str) -> Self {
        self.broken.lock().unwrap().insert(domain.to_string());
        self
    }

    /// Make every execution fail
    pub fn failing_execution(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    /// Create a new MockDnsProvider that shares state and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            dirty: Arc::clone(&other.dirty),
            broken: Arc::clone(&other.broken),
            fail_execute: other.fail_execute,
            fetch_call_count: Arc::clone(&other.fetch_call_count),
            execute_call_count: Arc::clone(&other.execute_call_count),
            executed: Arc::clone(&other.executed),
        }
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    pub fn execute_call_count(&self) -> usize {
        self.execute_call_count.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CorrectionExecutor for MockDnsProvider {
    async fn execute_correction(&self, correction: &Correction) -> Result<()> {
        self.execute_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_execute {
            return Err(Error::provider("mock", "write rejected"));
        }
        self.executed
            .lock()
            .unwrap()
            .push(correction.description.clone());
        // Converged
        self.dirty
            .lock()
            .unwrap()
            .remove(correction.action.domain());
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsServiceProvider for MockDnsProvider {
    async fn get_domain_corrections(&self, desired: &DomainConfig) -> Result<Vec<Correction>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);

        if self.broken.lock().unwrap().contains(&desired.name) {
            return Err(Error::provider("mock", "zone fetch failed"));
        }
        if !self.dirty.lock().unwrap().contains(&desired.name) {
            return Ok(Vec::new());
        }

        Ok(vec![Correction::new(
            format!("GENERATE_ZONE: {} ({} records)", desired.name, desired.records.len()),
            CorrectionAction::ReplaceRecords {
                domain: desired.name.clone(),
                records: desired.records.clone(),
            },
        )])
    }

    async fn get_nameservers(&self, _domain: &str) -> Result<Vec<Nameserver>> {
        Ok(Nameserver::from_names(["ns1.mock.test", "ns2.mock.test"]))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A mock Registrar that always reports a delegation change
pub struct MockRegistrar {
    /// Call counter for execute_correction()
    execute_call_count: Arc<AtomicUsize>,
}

impl MockRegistrar {
    pub fn new() -> Self {
        Self {
            execute_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            execute_call_count: Arc::clone(&other.execute_call_count),
        }
    }

    pub fn execute_call_count(&self) -> usize {
        self.execute_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CorrectionExecutor for MockRegistrar {
    async fn execute_correction(&self, _correction: &Correction) -> Result<()> {
        self.execute_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Registrar for MockRegistrar {
    async fn get_registrar_corrections(&self, desired: &DomainConfig) -> Result<Vec<Correction>> {
        let mut nameservers = desired.nameserver_names();
        nameservers.sort();
        Ok(vec![Correction::new(
            format!("Change Nameservers from '' to '{}'", nameservers.join(",")),
            CorrectionAction::SetNameservers {
                domain: desired.name.clone(),
                nameservers,
            },
        )])
    }

    fn registrar_name(&self) -> &'static str {
        "mock"
    }
}

/// Create a minimal reconciler config for testing
pub fn minimal_config(mode: RunMode) -> ReconcileConfig {
    let mut config = ReconcileConfig::new(ProviderConfig::Custom {
        factory: "mock".to_string(),
        config: serde_json::json!({}),
    });
    config.mode = mode;
    config
}

/// A desired domain with no records
pub fn domain(name: &str) -> DomainConfig {
    DomainConfig::new(name)
}
