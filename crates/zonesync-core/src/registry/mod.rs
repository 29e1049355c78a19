//! Plugin-based provider registry
//!
//! The registry allows DNS service providers and registrars to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonesync_core::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//! zonesync_provider_namecheap::register(&registry, connector);
//!
//! let provider = registry.create_dns_provider(&config)?;
//! let registrar = registry.create_registrar(&config)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsServiceProvider, DnsServiceProviderFactory, Registrar, RegistrarFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based provider creation
///
/// Maps provider type names (as returned by [`ProviderConfig::type_name`]) to
/// factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS service provider factories
    dns_providers: RwLock<HashMap<String, Box<dyn DnsServiceProviderFactory>>>,

    /// Registered registrar factories
    registrars: RwLock<HashMap<String, Box<dyn RegistrarFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS service provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "namecheap")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_dns_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn DnsServiceProviderFactory>,
    ) {
        let mut providers = self
            .dns_providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Register a registrar factory
    pub fn register_registrar(&self, name: impl Into<String>, factory: Box<dyn RegistrarFactory>) {
        let mut registrars = self
            .registrars
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registrars.insert(name.into(), factory);
    }

    /// Create a DNS service provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsServiceProvider>)`: Created provider instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_dns_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsServiceProvider>> {
        let provider_type = config.type_name();
        let providers = self
            .dns_providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown DNS provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// Create a registrar from configuration
    pub fn create_registrar(&self, config: &ProviderConfig) -> Result<Box<dyn Registrar>> {
        let registrar_type = config.type_name();
        let registrars = self
            .registrars
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = registrars
            .get(registrar_type)
            .ok_or_else(|| Error::config(format!("Unknown registrar type: {}", registrar_type)))?;

        factory.create(config)
    }

    /// List all registered DNS provider types, sorted
    pub fn list_dns_providers(&self) -> Vec<String> {
        let providers = self
            .dns_providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered registrar types, sorted
    pub fn list_registrars(&self) -> Vec<String> {
        let registrars = self
            .registrars
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = registrars.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a DNS provider type is registered
    pub fn has_dns_provider(&self, name: &str) -> bool {
        self.dns_providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Check if a registrar type is registered
    pub fn has_registrar(&self, name: &str) -> bool {
        self.registrars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}
