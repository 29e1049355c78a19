// # zonesync-core
//
// Core library for declarative DNS zone and delegation reconciliation.
//
// ## Architecture Overview
//
// This library provides the provider-independent half of the system:
// - **DnsServiceProvider**: Trait for comparing and correcting zone records
// - **Registrar**: Trait for comparing and correcting domain delegation
// - **CorrectionExecutor**: Trait for executing pure-data corrections
// - **Differ**: Record diff primitive (`KeyedDiffer` is the default)
// - **RetryPolicy**: Bounded fixed-backoff retry for rate-limited calls
// - **Reconciler**: Orchestrates preview / push runs over many domains
// - **ProviderRegistry**: Plugin-based registry for providers and registrars
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from provider adapters
// 2. **Corrections as Data**: Computing a change never performs it
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Idempotency**: Actual state is fetched fresh on every reconciliation

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod models;
pub mod names;
pub mod registry;
pub mod retry;
pub mod traits;

// Re-export core types for convenience
pub use config::{CredentialsFile, ProviderConfig, ReconcileConfig, RetryConfig, RunMode};
pub use diff::KeyedDiffer;
pub use engine::{DomainOutcome, DomainReport, ReconcileEvent, ReconcileReport, Reconciler};
pub use error::{Error, Result};
pub use models::{Correction, CorrectionAction, DomainConfig, Nameserver, RecordConfig};
pub use names::{DomainParts, PublicSuffixResolver, SuffixResolver};
pub use registry::ProviderRegistry;
pub use retry::RetryPolicy;
pub use traits::{
    Changeset, Correlation, CorrectionExecutor, Differ, DnsServiceProvider,
    DnsServiceProviderFactory, Registrar, RegistrarFactory,
};
