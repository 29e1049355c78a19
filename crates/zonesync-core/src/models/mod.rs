//! Data model shared by providers and the reconciler
//!
//! - [`DomainConfig`]: desired state for one domain
//! - [`RecordConfig`]: one DNS record, desired or actual
//! - [`Correction`]: a described change produced by reconciliation

pub mod correction;
pub mod domain;
pub mod record;

pub use correction::{Correction, CorrectionAction};
pub use domain::{DomainConfig, Nameserver};
pub use record::{downcase, RecordConfig, DEFAULT_TTL};
