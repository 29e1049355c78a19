// # Corrections
//
// A correction pairs a human-readable description with a pure-data action.
// Execution lives in one place per provider (`CorrectionExecutor`), so a list
// of corrections can be printed, serialized for a dry run, or executed later.

use super::record::RecordConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote change a correction performs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CorrectionAction {
    /// Overwrite the domain's entire record set
    ReplaceRecords {
        /// ASCII domain name
        domain: String,
        /// The complete desired record set
        records: Vec<RecordConfig>,
    },

    /// Point the domain's delegation at a custom nameserver list
    SetNameservers {
        /// ASCII domain name
        domain: String,
        /// Desired nameserver hostnames, sorted
        nameservers: Vec<String>,
    },
}

impl CorrectionAction {
    /// The domain this action applies to
    pub fn domain(&self) -> &str {
        match self {
            CorrectionAction::ReplaceRecords { domain, .. }
            | CorrectionAction::SetNameservers { domain, .. } => domain,
        }
    }

    /// Short action name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            CorrectionAction::ReplaceRecords { .. } => "replace_records",
            CorrectionAction::SetNameservers { .. } => "set_nameservers",
        }
    }
}

/// A described, executable unit of remote state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Human-readable summary of the change
    pub description: String,

    /// What executing the correction does
    pub action: CorrectionAction,
}

impl Correction {
    /// Create a correction
    pub fn new(description: impl Into<String>, action: CorrectionAction) -> Self {
        Self {
            description: description.into(),
            action,
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
