// # DNS Service Provider Trait
//
// Defines the interface for providers that host zone records.
//
// ## Implementations
//
// - Namecheap: `zonesync-provider-namecheap` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{DnsServiceProvider, CorrectionExecutor};
//
// let corrections = provider.get_domain_corrections(&desired).await?;
// for correction in &corrections {
//     println!("{}", correction);
//     provider.execute_correction(correction).await?;
// }
// ```

use async_trait::async_trait;

use crate::models::{Correction, DomainConfig, Nameserver};

/// Executes the pure-data actions carried by [`Correction`] values
///
/// Each provider implements execution once; corrections themselves hold no
/// behaviour, so they can be reviewed or serialized before anything runs.
#[async_trait]
pub trait CorrectionExecutor: Send + Sync {
    /// Perform the remote change described by `correction`
    ///
    /// # Idempotency
    ///
    /// Executing the same correction twice must converge to the same remote
    /// state without error.
    async fn execute_correction(&self, correction: &Correction) -> Result<(), crate::Error>;
}

/// Trait for DNS service provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe; callers may reconcile distinct
/// domains concurrently. Reconciling the same domain concurrently is not
/// supported (last write wins).
///
/// # State
///
/// Providers keep no state between calls: actual records are fetched fresh on
/// every [`get_domain_corrections`](Self::get_domain_corrections) call.
#[async_trait]
pub trait DnsServiceProvider: CorrectionExecutor {
    /// Compare desired records against the live zone
    ///
    /// # Parameters
    ///
    /// - `desired`: Desired state; not modified
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Correction>)`: Empty when the zone already matches
    /// - `Err(Error)`: If the live zone could not be fetched
    async fn get_domain_corrections(
        &self,
        desired: &DomainConfig,
    ) -> Result<Vec<Correction>, crate::Error>;

    /// Nameservers a domain must delegate to for this provider to serve it
    async fn get_nameservers(&self, domain: &str) -> Result<Vec<Nameserver>, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS service providers from configuration
pub trait DnsServiceProviderFactory: Send + Sync {
    /// Create a DnsServiceProvider instance from configuration
    ///
    /// Must fail with a configuration error, before any remote call, when
    /// credentials are missing.
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsServiceProvider>, crate::Error>;
}
