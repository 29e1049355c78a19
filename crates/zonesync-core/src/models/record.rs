// # DNS Records
//
// `RecordConfig` is the comparable shape shared by desired state (from the
// config layer) and actual state (synthesized from provider responses on every
// reconciliation). Both sides carry the fully-qualified name so a comparison
// never mixes relative and absolute forms.

use crate::names::add_origin;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default TTL applied when a record does not specify one (seconds)
pub const DEFAULT_TTL: u32 = 1800;

/// Record types whose target is a hostname and therefore case-insensitive
const HOSTNAME_TARGET_TYPES: &[&str] = &["ANAME", "CNAME", "MX", "NS", "PTR", "SRV"];

/// One DNS resource record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Zone-relative name (`@` for the apex)
    pub name: String,

    /// Fully-qualified name, without the trailing dot
    pub name_fqdn: String,

    /// Record type tag, e.g. "A", "CNAME", "MX" or a provider-specific type such as "URL"
    #[serde(rename = "type")]
    pub record_type: String,

    /// Target / address value
    pub target: String,

    /// Time-to-live in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// MX preference, only meaningful for MX records
    #[serde(default)]
    pub mx_preference: u16,

    /// Opaque copy of the provider's representation, set on actual-state records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<serde_json::Value>,
}

impl RecordConfig {
    /// Create a record from a zone-relative name
    ///
    /// # Parameters
    ///
    /// - `record_type`: Record type tag
    /// - `name`: Zone-relative name (`@` for the apex)
    /// - `target`: Target / address value
    /// - `origin`: The zone the name is relative to
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
        origin: &str,
    ) -> Self {
        let name = name.into();
        let name_fqdn = add_origin(&name, origin);
        Self {
            name,
            name_fqdn,
            record_type: record_type.into(),
            target: target.into(),
            ttl: DEFAULT_TTL,
            mx_preference: 0,
            original: None,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the MX preference
    pub fn with_mx_preference(mut self, preference: u16) -> Self {
        self.mx_preference = preference;
        self
    }

    /// Whether the record type matches `record_type`, ignoring case
    pub fn is_type(&self, record_type: &str) -> bool {
        self.record_type.eq_ignore_ascii_case(record_type)
    }

    /// Whether two records carry the same data (target, TTL and MX preference)
    pub fn same_content(&self, other: &Self) -> bool {
        self.target == other.target
            && self.ttl == other.ttl
            && self.mx_preference == other.mx_preference
    }

    /// Human-readable rendering of the record data
    pub fn content(&self) -> String {
        if self.is_type("MX") {
            format!("{} {}", self.mx_preference, self.target)
        } else {
            self.target.clone()
        }
    }
}

impl fmt::Display for RecordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ttl={}",
            self.record_type,
            self.name_fqdn,
            self.content(),
            self.ttl
        )
    }
}

/// Case-normalize records for comparison
///
/// Names are lower-cased, types upper-cased, and targets lower-cased for
/// types whose target is a hostname. Targets of other types (TXT, URL, ...)
/// are case-sensitive and left untouched.
pub fn downcase(records: &mut [RecordConfig]) {
    for record in records.iter_mut() {
        record.name = record.name.to_lowercase();
        record.name_fqdn = record.name_fqdn.to_lowercase();
        record.record_type = record.record_type.to_uppercase();
        if HOSTNAME_TARGET_TYPES.contains(&record.record_type.as_str()) {
            record.target = record.target.to_lowercase();
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}
