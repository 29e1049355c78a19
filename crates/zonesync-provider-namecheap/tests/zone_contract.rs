//! Contract Test: Zone Reconciliation
//!
//! Constraints verified:
//! - A converged zone yields no corrections, every time
//! - Executing the single correction converges the zone
//! - Name, type and hostname-target case never cause a diff
//! - SOA records never surface
//! - The parking placeholder counts as an empty zone
//! - Apex NS records are never managed
//! - Unsupported record types fail before any remote call; Namecheap's own
//!   types are written through
//! - Only rate-limited calls are retried, and only up to the bound

mod common;

use common::*;
use zonesync_core::error::Error;
use zonesync_core::models::{CorrectionAction, DomainConfig, RecordConfig};
use zonesync_core::traits::{CorrectionExecutor, DnsServiceProvider};
use zonesync_provider_namecheap::HostRecord;

fn live_zone() -> Vec<HostRecord> {
    vec![
        HostRecord::new("@", "A", "1.2.3.4", 1800),
        HostRecord::new("www", "CNAME", "example.com.", 1800),
        HostRecord::new("@", "MX", "mx.example.com.", 1800).with_mx_pref(10),
    ]
}

fn desired_zone() -> DomainConfig {
    desired(vec![
        record("A", "@", "1.2.3.4"),
        record("CNAME", "www", "example.com."),
        record("MX", "@", "mx.example.com.").with_mx_preference(10),
    ])
}

#[tokio::test]
async fn converged_zone_is_idempotent() {
    let api = api_with_zone(live_zone());
    let provider = provider(&api);

    for _ in 0..2 {
        let corrections = provider.get_domain_corrections(&desired_zone()).await.unwrap();
        assert!(corrections.is_empty(), "unexpected: {:?}", corrections);
    }
    assert_eq!(api.get_hosts_calls(), 2);
    assert_eq!(api.set_hosts_calls(), 0);
}

#[tokio::test]
async fn executing_correction_converges() {
    let api = api_with_zone(vec![
        HostRecord::new("@", "A", "5.6.7.8", 1800),
        HostRecord::new("old", "A", "5.6.7.8", 1800),
    ]);
    let provider = provider(&api);
    let desired = desired_zone();

    let corrections = provider.get_domain_corrections(&desired).await.unwrap();
    assert_eq!(corrections.len(), 1);

    let correction = &corrections[0];
    assert!(correction
        .description
        .starts_with("GENERATE_ZONE: example.com (3 records)\n"));
    assert!(correction
        .description
        .contains("CREATE CNAME www.example.com example.com. ttl=1800"));
    assert!(correction
        .description
        .contains("DELETE A old.example.com 5.6.7.8 ttl=1800"));
    match &correction.action {
        CorrectionAction::ReplaceRecords { domain, records } => {
            assert_eq!(domain, "example.com");
            assert_eq!(records.len(), 3);
        }
        other => panic!("unexpected action: {:?}", other),
    }

    provider.execute_correction(correction).await.unwrap();

    let hosts = api.hosts(DOMAIN);
    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[1].name, "www");
    assert_eq!(hosts[2].mx_pref, 10);

    let again = provider.get_domain_corrections(&desired).await.unwrap();
    assert!(again.is_empty());
    assert_eq!(api.set_hosts_calls(), 1);
}

#[tokio::test]
async fn executing_twice_is_harmless() {
    let api = api_with_zone(Vec::new());
    let provider = provider(&api);

    let corrections = provider.get_domain_corrections(&desired_zone()).await.unwrap();
    provider.execute_correction(&corrections[0]).await.unwrap();
    provider.execute_correction(&corrections[0]).await.unwrap();

    assert!(provider
        .get_domain_corrections(&desired_zone())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn case_differences_are_ignored() {
    let api = api_with_zone(vec![
        HostRecord::new("WWW", "a", "1.2.3.4", 1800),
        HostRecord::new("blog", "CNAME", "Host.Example.NET.", 1800),
    ]);
    let provider = provider(&api);

    let desired = desired(vec![
        record("A", "www", "1.2.3.4"),
        record("cname", "Blog", "host.example.net."),
    ]);

    let corrections = provider.get_domain_corrections(&desired).await.unwrap();
    assert!(corrections.is_empty(), "unexpected: {:?}", corrections);
}

#[tokio::test]
async fn soa_never_surfaces() {
    let mut hosts = live_zone();
    hosts.push(HostRecord::new("@", "SOA", "dns1.registrar-servers.com.", 3601));
    let api = api_with_zone(hosts);
    let provider = provider(&api);

    assert!(provider
        .get_domain_corrections(&desired_zone())
        .await
        .unwrap()
        .is_empty());

    let mut changed = desired_zone();
    changed.records.push(record("A", "new", "9.9.9.9"));
    let corrections = provider.get_domain_corrections(&changed).await.unwrap();
    assert_eq!(corrections.len(), 1);
    assert!(!corrections[0].description.contains("SOA"));
}

#[tokio::test]
async fn parking_placeholder_is_empty_zone() {
    // Registrar fills an empty zone with its parking page
    let api = api_with_zone(Vec::new());
    let provider = provider(&api);

    let corrections = provider.get_domain_corrections(&desired(Vec::new())).await.unwrap();
    assert!(corrections.is_empty());
}

#[tokio::test]
async fn emptying_zone_converges_to_placeholder() {
    let api = api_with_zone(live_zone());
    let provider = provider(&api);
    let empty = desired(Vec::new());

    let corrections = provider.get_domain_corrections(&empty).await.unwrap();
    assert_eq!(corrections.len(), 1);
    assert!(corrections[0]
        .description
        .starts_with("GENERATE_ZONE: example.com (0 records)"));

    provider.execute_correction(&corrections[0]).await.unwrap();
    assert_eq!(api.hosts(DOMAIN).len(), 2);

    assert!(provider.get_domain_corrections(&empty).await.unwrap().is_empty());
}

#[tokio::test]
async fn apex_ns_is_never_managed() {
    let api = api_with_zone(live_zone());
    let provider = provider(&api);

    let mut with_ns = desired_zone();
    with_ns.records.push(record("NS", "@", "ns1.other-dns.net."));
    with_ns.records.push(record("NS", "@", "dns1.registrar-servers.com."));

    let corrections = provider.get_domain_corrections(&with_ns).await.unwrap();
    assert!(corrections.is_empty());

    // Delegated subzones are ordinary records
    with_ns.records.push(record("NS", "sub", "ns1.other-dns.net."));
    let corrections = provider.get_domain_corrections(&with_ns).await.unwrap();
    match &corrections[0].action {
        CorrectionAction::ReplaceRecords { records, .. } => {
            assert_eq!(records.iter().filter(|r| r.is_type("NS")).count(), 1);
        }
        other => panic!("unexpected action: {:?}", other),
    }
}

#[tokio::test]
async fn desired_state_is_not_mutated() {
    let api = api_with_zone(Vec::new());
    let provider = provider(&api);

    let mut original = desired_zone();
    original.records.push(record("NS", "@", "ns1.other-dns.net."));
    let before = original.clone();

    provider.get_domain_corrections(&original).await.unwrap();
    assert_eq!(original, before);
}

#[tokio::test]
async fn unicode_domain_is_punycoded() {
    let api = std::sync::Arc::new(
        zonesync_provider_namecheap::InMemoryNamecheap::new()
            .with_zone("xn--bcher-kva.example", Vec::new()),
    );
    let provider = provider(&api);

    let dc = DomainConfig::new("Bücher.example").with_record(RecordConfig::new(
        "A",
        "www",
        "1.2.3.4",
        "Bücher.example",
    ));

    let corrections = provider.get_domain_corrections(&dc).await.unwrap();
    assert_eq!(corrections[0].action.domain(), "xn--bcher-kva.example");
    assert!(corrections[0]
        .description
        .contains("CREATE A www.xn--bcher-kva.example 1.2.3.4 ttl=1800"));

    provider.execute_correction(&corrections[0]).await.unwrap();
    assert_eq!(api.hosts("xn--bcher-kva.example")[0].name, "www");
}

#[tokio::test]
async fn rate_limited_fetch_is_retried() {
    let api = api_with_zone(live_zone());
    api.rate_limit_next(2);
    let provider = provider_with_attempts(&api, 3);

    let corrections = provider.get_domain_corrections(&desired_zone()).await.unwrap();
    assert!(corrections.is_empty());
    assert_eq!(api.get_hosts_calls(), 3);
}

#[tokio::test]
async fn retry_exhaustion_returns_last_error() {
    let api = api_with_zone(live_zone());
    api.rate_limit_next(10);
    let provider = provider_with_attempts(&api, 4);

    let err = provider
        .get_domain_corrections(&desired_zone())
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(api.get_hosts_calls(), 4);
}

#[tokio::test]
async fn rate_limited_write_is_retried() {
    let api = api_with_zone(Vec::new());
    let provider = provider_with_attempts(&api, 3);

    let corrections = provider.get_domain_corrections(&desired_zone()).await.unwrap();
    api.rate_limit_next(1);
    provider.execute_correction(&corrections[0]).await.unwrap();

    assert_eq!(api.set_hosts_calls(), 2);
    assert_eq!(api.hosts(DOMAIN).len(), 3);
}

#[tokio::test]
async fn other_errors_are_not_retried() {
    let api = api_with_zone(live_zone());
    api.fail_with(1011102, "API Key is invalid or API access has not been enabled");
    let provider = provider(&api);

    let err = provider
        .get_domain_corrections(&desired_zone())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
    assert_eq!(api.get_hosts_calls(), 1);
}

#[tokio::test]
async fn fetch_errors_propagate() {
    let api = api_with_zone(live_zone());
    let provider = provider(&api);

    let err = provider
        .get_domain_corrections(&DomainConfig::new("unknown.org"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn unsupported_record_types_are_rejected() {
    let api = api_with_zone(live_zone());
    let provider = provider(&api);

    for record_type in ["SRV", "ptr", "CAA", "TLSA", "ALIAS"] {
        let mut dc = desired_zone();
        dc.records.push(record(record_type, "x", "target.example.net."));

        let err = provider.get_domain_corrections(&dc).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)), "{}: {:?}", record_type, err);
    }
    assert_eq!(api.get_hosts_calls(), 0);
}

#[tokio::test]
async fn custom_record_types_are_written_through() {
    let api = api_with_zone(live_zone());
    let provider = provider(&api);

    let mut dc = desired_zone();
    dc.records.push(record("URL301", "go", "https://example.org/"));
    dc.records.push(record("frame", "embed", "https://example.org/embed"));

    let corrections = provider.get_domain_corrections(&dc).await.unwrap();
    assert_eq!(corrections.len(), 1);
    provider.execute_correction(&corrections[0]).await.unwrap();

    let hosts = api.hosts(DOMAIN);
    assert!(hosts
        .iter()
        .any(|h| h.name == "go" && h.record_type == "URL301" && h.address == "https://example.org/"));
    assert!(hosts.iter().any(|h| h.name == "embed" && h.record_type == "FRAME"));

    assert!(provider.get_domain_corrections(&dc).await.unwrap().is_empty());
}
