//! Preview and push against an in-memory Namecheap account
//!
//! Seeds a zone, previews the corrections needed to reach a desired state,
//! pushes them, then previews again to show the zone has converged.
//!
//! Environment:
//! - `ZONESYNC_LOG_LEVEL`: trace, debug, info (default), warn or error
//! - `ZONESYNC_CREDENTIALS`: optional JSON credentials file with a
//!   `namecheap` entry (`apiuser`, `apikey`)

use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::{
    CredentialsFile, DomainConfig, DomainOutcome, Nameserver, ProviderConfig, ProviderRegistry,
    ReconcileConfig, ReconcileEvent, Reconciler, RecordConfig, RetryConfig, RunMode,
};
use zonesync_provider_namecheap::{HostRecord, InMemoryConnector, InMemoryNamecheap};

const DOMAIN: &str = "example.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = match std::env::var("ZONESYNC_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let provider_config = load_provider_config().await?;

    let api = Arc::new(InMemoryNamecheap::new().with_zone(
        DOMAIN,
        vec![
            HostRecord::new("@", "A", "192.0.2.10", 1800),
            HostRecord::new("www", "CNAME", "example.com.", 1800),
            HostRecord::new("legacy", "A", "192.0.2.99", 1800),
        ],
    ));

    let registry = ProviderRegistry::new();
    zonesync_provider_namecheap::register(&registry, Arc::new(InMemoryConnector::new(api.clone())));
    info!("Registered providers: {:?}", registry.list_dns_providers());

    let desired = vec![desired_state()];

    let mut config = ReconcileConfig::new(provider_config.clone());
    config.registrar = Some(provider_config);

    // Preview
    let (previewer, _events) = Reconciler::from_registry(&registry, &config)?;
    let report = previewer.reconcile_all(&desired).await;
    print_report("preview", &report.outcomes);

    // Push
    config.mode = RunMode::Push;
    let (pusher, mut events) = Reconciler::from_registry(&registry, &config)?;
    let report = pusher.reconcile_all(&desired).await;
    print_report("push", &report.outcomes);
    while let Ok(event) = events.try_recv() {
        if let ReconcileEvent::CorrectionApplied { domain, .. } = event {
            info!("Applied a correction to {}", domain);
        }
    }

    // Converged
    let report = previewer.reconcile_all(&desired).await;
    print_report("after push", &report.outcomes);

    info!(
        "Zone now holds {} hosts, delegated to {:?}",
        api.hosts(DOMAIN).len(),
        api.nameservers(DOMAIN)
    );

    Ok(())
}

/// Credentials from `ZONESYNC_CREDENTIALS`, or demo values
async fn load_provider_config() -> anyhow::Result<ProviderConfig> {
    match std::env::var("ZONESYNC_CREDENTIALS") {
        Ok(path) => {
            let file = CredentialsFile::load(&path).await?;
            Ok(file.provider_config("namecheap", "namecheap")?)
        }
        Err(_) => Ok(ProviderConfig::Namecheap {
            api_user: "demo".to_string(),
            api_key: "demo-key".to_string(),
            base_url: None,
            retry: RetryConfig::default(),
        }),
    }
}

fn desired_state() -> DomainConfig {
    DomainConfig::new(DOMAIN)
        .with_record(RecordConfig::new("A", "@", "192.0.2.10", DOMAIN))
        .with_record(RecordConfig::new("CNAME", "www", "example.com.", DOMAIN))
        .with_record(RecordConfig::new("MX", "@", "mail.example.com.", DOMAIN).with_mx_preference(10))
        .with_record(RecordConfig::new("TXT", "@", "v=spf1 mx -all", DOMAIN).with_ttl(300))
        .with_nameservers(Nameserver::from_names([
            "dns1.registrar-servers.com",
            "dns2.registrar-servers.com",
        ]))
}

fn print_report(stage: &str, outcomes: &[DomainOutcome]) {
    println!("== {} ==", stage);
    for outcome in outcomes {
        match outcome {
            DomainOutcome::Reconciled(report) if report.is_in_sync() => {
                println!("{}: in sync", report.domain);
            }
            DomainOutcome::Reconciled(report) => {
                for correction in report
                    .dns_corrections
                    .iter()
                    .chain(&report.registrar_corrections)
                {
                    println!("{}", correction);
                }
                println!("{}: {} applied", report.domain, report.applied);
            }
            DomainOutcome::Failed { domain, error } => {
                println!("{}: FAILED: {}", domain, error);
            }
        }
    }
}
