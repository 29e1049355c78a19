// # Differ Trait
//
// The record diff primitive. Providers treat it as a black box returning
// unchanged / create / delete / modify sets; `crate::diff::KeyedDiffer` is the
// default implementation.

use crate::models::RecordConfig;
use std::fmt;

/// One entry of a changeset, pairing an actual record with a desired one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    /// The live record, absent for creations
    pub existing: Option<RecordConfig>,
    /// The desired record, absent for deletions
    pub desired: Option<RecordConfig>,
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.existing, &self.desired) {
            (None, Some(d)) => write!(f, "CREATE {}", d),
            (Some(e), None) => write!(f, "DELETE {}", e),
            (Some(e), Some(d)) if e == d => write!(f, "UNCHANGED {}", d),
            (Some(e), Some(d)) => write!(
                f,
                "MODIFY {} {}: ({} ttl={}) -> ({} ttl={})",
                d.record_type,
                d.name_fqdn,
                e.content(),
                e.ttl,
                d.content(),
                d.ttl
            ),
            (None, None) => f.write_str("EMPTY"),
        }
    }
}

/// Result of comparing desired records against actual records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    /// Records present and identical on both sides
    pub unchanged: Vec<Correlation>,
    /// Desired records missing from the live set
    pub create: Vec<Correlation>,
    /// Live records not desired
    pub delete: Vec<Correlation>,
    /// Records present on both sides with different data
    pub modify: Vec<Correlation>,
}

impl Changeset {
    /// Whether nothing needs to change
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.delete.is_empty() && self.modify.is_empty()
    }

    /// Human-readable lines for every create, delete and modify entry
    pub fn describe(&self) -> Vec<String> {
        self.create
            .iter()
            .chain(&self.delete)
            .chain(&self.modify)
            .map(ToString::to_string)
            .collect()
    }
}

/// Trait for record diff implementations
pub trait Differ: Send + Sync {
    /// Compare two case-normalized record sets
    fn incremental_diff(&self, desired: &[RecordConfig], actual: &[RecordConfig]) -> Changeset;
}
