//! Conversion between Namecheap host records and [`RecordConfig`]
//!
//! Also holds the two registrar quirks the comparison has to know about: the
//! parking placeholder injected into empty zones, and apex NS records that
//! basic DNS does not let anyone change.

use crate::api::HostRecord;
use tracing::warn;
use zonesync_core::models::{downcase, DomainConfig, RecordConfig};
use zonesync_core::names::{add_origin, trim_domain_name};
use zonesync_core::Result;

/// Marker in the CNAME target of the parking placeholder
const PARKING_MARKER: &str = "parkingpage";

/// Convert fetched hosts into case-normalized records, dropping SOA
///
/// # Parameters
///
/// - `hosts`: Hosts as returned by the API
/// - `domain`: ASCII domain name, used as the origin
pub fn hosts_to_records(hosts: &[HostRecord], domain: &str) -> Result<Vec<RecordConfig>> {
    let mut records = Vec::with_capacity(hosts.len());

    for host in hosts {
        if host.record_type.eq_ignore_ascii_case("SOA") {
            continue;
        }

        records.push(RecordConfig {
            name: host.name.clone(),
            name_fqdn: add_origin(&host.name, domain),
            record_type: host.record_type.clone(),
            target: host.address.clone(),
            ttl: host.ttl,
            mx_preference: host.mx_pref,
            original: Some(serde_json::to_value(host)?),
        });
    }

    downcase(&mut records);
    Ok(records)
}

/// Convert desired records into the flat host list `setHosts` expects
///
/// Host ids are local and sequential from 1.
pub fn records_to_hosts(records: &[RecordConfig], domain: &str) -> Vec<HostRecord> {
    records
        .iter()
        .zip(1u64..)
        .map(|(record, host_id)| HostRecord {
            host_id,
            name: trim_domain_name(&record.name_fqdn, domain),
            record_type: record.record_type.clone(),
            address: record.target.clone(),
            mx_pref: record.mx_preference,
            ttl: record.ttl,
        })
        .collect()
}

/// Whether `hosts` is the placeholder Namecheap injects into a zone with no
/// records, while the desired state is empty too
///
/// The placeholder is one CNAME pointing at a parking page and one URL
/// redirect, in either order.
pub fn is_parking_placeholder(desired: &[RecordConfig], hosts: &[HostRecord]) -> bool {
    if !desired.is_empty() || hosts.len() != 2 {
        return false;
    }

    let is_parking_cname = |h: &HostRecord| {
        h.record_type.eq_ignore_ascii_case("CNAME")
            && h.address.to_lowercase().contains(PARKING_MARKER)
    };
    let is_url = |h: &HostRecord| h.record_type.eq_ignore_ascii_case("URL");

    (is_parking_cname(&hosts[0]) && is_url(&hosts[1]))
        || (is_url(&hosts[0]) && is_parking_cname(&hosts[1]))
}

/// Lower-case a nameserver hostname and drop its trailing dot
pub fn normalize_nameserver(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

/// Sort normalized nameserver names and join them with commas
pub fn join_nameservers<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sorted_nameservers(names).join(",")
}

/// Normalize and sort nameserver names
pub fn sorted_nameservers<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .map(|n| normalize_nameserver(n.as_ref()))
        .collect();
    names.sort();
    names
}

/// Whether `target` is one of the registrar's own nameservers
///
/// Matches the configured defaults exactly, or any host under the same
/// parent domain (`dns3.registrar-servers.com` for the stock defaults).
pub fn is_registrar_default(target: &str, defaults: &[String]) -> bool {
    let target = normalize_nameserver(target);

    defaults.iter().any(|default| {
        let default = normalize_nameserver(default);
        if target == default {
            return true;
        }
        match default.split_once('.') {
            Some((_, parent)) if parent.contains('.') => target.ends_with(&format!(".{}", parent)),
            _ => false,
        }
    })
}

/// Drop apex NS records from the desired state
///
/// Namecheap basic DNS does not allow changing apex NS, so managing them must
/// be a no-op. A warning is logged unless the record already points at the
/// registrar's own nameservers.
pub fn strip_apex_nameservers(dc: &mut DomainConfig, defaults: &[String]) {
    let origin = dc.name.clone();

    dc.filter(|record| {
        let apex_ns =
            record.is_type("NS") && record.name_fqdn.eq_ignore_ascii_case(&origin);
        if apex_ns && !is_registrar_default(&record.target, defaults) {
            warn!(
                "Namecheap does not support changing apex NS records. Skipping {}",
                record.target
            );
        }
        !apex_ns
    });
}
