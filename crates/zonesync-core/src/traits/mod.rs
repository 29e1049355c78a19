//! Core traits for zonesync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsServiceProvider`]: Compare and correct zone records
//! - [`Registrar`]: Compare and correct domain delegation
//! - [`CorrectionExecutor`]: Execute correction actions
//! - [`Differ`]: Record diff primitive

pub mod differ;
pub mod dns_provider;
pub mod registrar;

pub use differ::{Changeset, Correlation, Differ};
pub use dns_provider::{CorrectionExecutor, DnsServiceProvider, DnsServiceProviderFactory};
pub use registrar::{Registrar, RegistrarFactory};
