//! Default record differ
//!
//! [`KeyedDiffer`] groups records by `(fqdn, type)` and matches within each
//! group:
//!
//! 1. identical target, TTL and MX preference → unchanged
//! 2. identical target, other fields differ → modify
//! 3. remaining records paired in order → modify
//! 4. leftovers → create (desired) or delete (actual)
//!
//! Inputs are expected to be case-normalized with
//! [`downcase`](crate::models::downcase). SOA records are ignored on both sides.

use std::collections::BTreeMap;

use crate::models::RecordConfig;
use crate::traits::{Changeset, Correlation, Differ};

/// Records of this type are never diffed
const IGNORED_TYPE: &str = "SOA";

/// [`Differ`] keyed on record name and type
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedDiffer;

impl KeyedDiffer {
    /// Create a differ
    pub fn new() -> Self {
        Self
    }
}

#[derive(Default)]
struct Group {
    desired: Vec<RecordConfig>,
    actual: Vec<RecordConfig>,
}

impl Differ for KeyedDiffer {
    fn incremental_diff(&self, desired: &[RecordConfig], actual: &[RecordConfig]) -> Changeset {
        let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();

        for record in desired.iter().filter(|r| !r.is_type(IGNORED_TYPE)) {
            groups
                .entry((record.name_fqdn.clone(), record.record_type.clone()))
                .or_default()
                .desired
                .push(record.clone());
        }
        for record in actual.iter().filter(|r| !r.is_type(IGNORED_TYPE)) {
            groups
                .entry((record.name_fqdn.clone(), record.record_type.clone()))
                .or_default()
                .actual
                .push(record.clone());
        }

        let mut changes = Changeset::default();
        for (_, group) in groups {
            diff_group(group, &mut changes);
        }
        changes
    }
}

fn diff_group(group: Group, changes: &mut Changeset) {
    let Group {
        desired,
        mut actual,
    } = group;

    let mut unmatched = Vec::new();
    for d in desired {
        match actual.iter().position(|a| a.same_content(&d)) {
            Some(i) => changes.unchanged.push(Correlation {
                existing: Some(actual.remove(i)),
                desired: Some(d),
            }),
            None => unmatched.push(d),
        }
    }

    let mut leftover = Vec::new();
    for d in unmatched {
        match actual.iter().position(|a| a.target == d.target) {
            Some(i) => changes.modify.push(Correlation {
                existing: Some(actual.remove(i)),
                desired: Some(d),
            }),
            None => leftover.push(d),
        }
    }

    let mut actual = actual.into_iter();
    for d in leftover {
        match actual.next() {
            Some(a) => changes.modify.push(Correlation {
                existing: Some(a),
                desired: Some(d),
            }),
            None => changes.create.push(Correlation {
                existing: None,
                desired: Some(d),
            }),
        }
    }

    for a in actual {
        changes.delete.push(Correlation {
            existing: Some(a),
            desired: None,
        });
    }
}
