//! Reconciliation orchestrator
//!
//! The Reconciler is responsible for:
//! - Asking the DNS provider for zone corrections
//! - Asking the registrar (if any) for delegation corrections
//! - Executing corrections in push mode, stopping at the first failure
//! - Reporting progress as events
//!
//! ## Architecture
//!
//! ```text
//!                        ┌──────────────┐
//!     DomainConfig ────▶ │  Reconciler  │ ─── ReconcileEvent ──▶ monitoring
//!                        └──────────────┘
//!                                │
//!              ┌─────────────────┴─────────────────┐
//!              ▼                                   ▼
//!    ┌────────────────────┐              ┌──────────────────┐
//!    │ DnsServiceProvider │              │    Registrar     │
//!    │ (zone corrections) │              │ (delegation)     │
//!    └────────────────────┘              └──────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! [`Reconciler::reconcile_domain`] returns the first error it meets.
//! [`Reconciler::reconcile_all`] records a failed domain and moves on to the
//! next one.

use crate::config::{ReconcileConfig, RunMode};
use crate::error::Result;
use crate::models::{Correction, DomainConfig};
use crate::registry::ProviderRegistry;
use crate::traits::{CorrectionExecutor, DnsServiceProvider, Registrar};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the Reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// A run over a list of domains started
    Started { domains_count: usize },

    /// A domain was found to need a correction
    CorrectionFound { domain: String, description: String },

    /// A correction was executed successfully
    CorrectionApplied { domain: String, description: String },

    /// A correction failed to execute
    CorrectionFailed { domain: String, error: String },

    /// A domain already matches its desired state
    DomainInSync { domain: String },

    /// Corrections for a domain could not be computed or applied
    DomainFailed { domain: String, error: String },

    /// A run finished
    Finished { corrections: usize, failures: usize },
}

/// Outcome of reconciling one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    /// Domain name as given in the desired state
    pub domain: String,
    /// Zone corrections from the DNS provider
    pub dns_corrections: Vec<Correction>,
    /// Delegation corrections from the registrar
    pub registrar_corrections: Vec<Correction>,
    /// Number of corrections executed (always 0 in preview mode)
    pub applied: usize,
}

impl DomainReport {
    /// Total number of corrections found
    pub fn correction_count(&self) -> usize {
        self.dns_corrections.len() + self.registrar_corrections.len()
    }

    /// Whether the domain already matched its desired state
    pub fn is_in_sync(&self) -> bool {
        self.correction_count() == 0
    }
}

/// Per-domain outcome of a [`Reconciler::reconcile_all`] run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DomainOutcome {
    /// The domain was reconciled (possibly with corrections)
    Reconciled(DomainReport),
    /// The domain was skipped after an error
    Failed { domain: String, error: String },
}

/// Summary of a [`Reconciler::reconcile_all`] run
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// One outcome per input domain, in input order
    pub outcomes: Vec<DomainOutcome>,
}

impl ReconcileReport {
    /// Total corrections found across all reconciled domains
    pub fn correction_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                DomainOutcome::Reconciled(report) => report.correction_count(),
                DomainOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Number of domains that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DomainOutcome::Failed { .. }))
            .count()
    }
}

/// Reconciliation orchestrator
///
/// ## Threading
///
/// Domains are processed one after another; every remote call is awaited in
/// turn. No tasks are spawned.
pub struct Reconciler {
    /// Provider hosting the zone records
    dns_provider: Box<dyn DnsServiceProvider>,

    /// Registrar managing delegation, if configured
    registrar: Option<Box<dyn Registrar>>,

    /// Preview or push
    mode: RunMode,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<ReconcileEvent>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Returns
    ///
    /// A tuple of (reconciler, event_receiver) where event_receiver yields reconciler events
    pub fn new(
        dns_provider: Box<dyn DnsServiceProvider>,
        registrar: Option<Box<dyn Registrar>>,
        config: &ReconcileConfig,
    ) -> Result<(Self, mpsc::Receiver<ReconcileEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let reconciler = Self {
            dns_provider,
            registrar,
            mode: config.mode,
            event_tx: tx,
        };

        Ok((reconciler, rx))
    }

    /// Create a reconciler whose providers are built by `registry`
    pub fn from_registry(
        registry: &ProviderRegistry,
        config: &ReconcileConfig,
    ) -> Result<(Self, mpsc::Receiver<ReconcileEvent>)> {
        let dns_provider = registry.create_dns_provider(&config.dns_provider)?;
        let registrar = config
            .registrar
            .as_ref()
            .map(|r| registry.create_registrar(r))
            .transpose()?;

        Self::new(dns_provider, registrar, config)
    }

    /// Reconcile a single domain
    ///
    /// # Returns
    ///
    /// - `Ok(DomainReport)`: Corrections found (and, in push mode, executed)
    /// - `Err(Error)`: The first fetch or execution error
    pub async fn reconcile_domain(&self, desired: &DomainConfig) -> Result<DomainReport> {
        let domain = desired.name.clone();
        debug!(
            "Reconciling {} via {}",
            domain,
            self.dns_provider.provider_name()
        );

        let dns_corrections = self.dns_provider.get_domain_corrections(desired).await?;

        let registrar_corrections = match &self.registrar {
            Some(registrar) => registrar.get_registrar_corrections(desired).await?,
            None => Vec::new(),
        };

        for correction in dns_corrections.iter().chain(&registrar_corrections) {
            info!("{}: {}", domain, correction);
            self.emit_event(ReconcileEvent::CorrectionFound {
                domain: domain.clone(),
                description: correction.description.clone(),
            });
        }

        let mut report = DomainReport {
            domain: domain.clone(),
            dns_corrections,
            registrar_corrections,
            applied: 0,
        };

        if report.is_in_sync() {
            debug!("{} is in sync", domain);
            self.emit_event(ReconcileEvent::DomainInSync { domain });
            return Ok(report);
        }

        if self.mode == RunMode::Push {
            report.applied += self
                .apply_all(&domain, self.dns_provider.as_ref(), &report.dns_corrections)
                .await?;
            if let Some(registrar) = &self.registrar {
                report.applied += self
                    .apply_all(&domain, registrar.as_ref(), &report.registrar_corrections)
                    .await?;
            }
        }

        Ok(report)
    }

    /// Reconcile every domain, continuing past failures
    pub async fn reconcile_all(&self, domains: &[DomainConfig]) -> ReconcileReport {
        let started_at = Utc::now();
        self.emit_event(ReconcileEvent::Started {
            domains_count: domains.len(),
        });

        let mut outcomes = Vec::with_capacity(domains.len());
        for desired in domains {
            match self.reconcile_domain(desired).await {
                Ok(report) => outcomes.push(DomainOutcome::Reconciled(report)),
                Err(e) => {
                    error!("Failed to reconcile {}: {}", desired.name, e);
                    self.emit_event(ReconcileEvent::DomainFailed {
                        domain: desired.name.clone(),
                        error: e.to_string(),
                    });
                    outcomes.push(DomainOutcome::Failed {
                        domain: desired.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = ReconcileReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        self.emit_event(ReconcileEvent::Finished {
            corrections: report.correction_count(),
            failures: report.failure_count(),
        });

        report
    }

    /// Execute corrections in order, stopping at the first failure
    async fn apply_all<E>(
        &self,
        domain: &str,
        executor: &E,
        corrections: &[Correction],
    ) -> Result<usize>
    where
        E: CorrectionExecutor + ?Sized,
    {
        let mut applied = 0;
        for correction in corrections {
            if let Err(e) = executor.execute_correction(correction).await {
                self.emit_event(ReconcileEvent::CorrectionFailed {
                    domain: domain.to_string(),
                    error: e.to_string(),
                });
                return Err(e);
            }

            info!("{}: applied {}", domain, correction.action.kind());
            self.emit_event(ReconcileEvent::CorrectionApplied {
                domain: domain.to_string(),
                description: correction.description.clone(),
            });
            applied += 1;
        }
        Ok(applied)
    }

    /// Emit a reconciler event
    fn emit_event(&self, event: ReconcileEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}
