// # Registrar Trait
//
// Registrars own the delegation (the authoritative nameserver set) of a
// domain. It is compared separately from the zone contents.

use async_trait::async_trait;

use super::dns_provider::CorrectionExecutor;
use crate::models::{Correction, DomainConfig};

/// Trait for registrar implementations
#[async_trait]
pub trait Registrar: CorrectionExecutor {
    /// Compare the desired nameservers against the registrar's delegation
    ///
    /// Order of nameservers is not significant.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Correction>)`: At most one correction; empty when equal
    /// - `Err(Error)`: If the delegation could not be fetched
    async fn get_registrar_corrections(
        &self,
        desired: &DomainConfig,
    ) -> Result<Vec<Correction>, crate::Error>;

    /// Get the registrar name (for logging/debugging)
    fn registrar_name(&self) -> &'static str;
}

/// Helper trait for constructing registrars from configuration
pub trait RegistrarFactory: Send + Sync {
    /// Create a Registrar instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn Registrar>, crate::Error>;
}
