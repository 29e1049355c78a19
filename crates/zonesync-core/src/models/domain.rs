//! Desired state for one domain

use super::record::RecordConfig;
use crate::error::Result;
use crate::names::{add_origin, to_ascii, trim_domain_name};
use serde::{Deserialize, Serialize};

/// A delegation target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nameserver {
    /// Nameserver hostname
    pub name: String,
}

impl Nameserver {
    /// Create a nameserver entry
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Convert a list of hostnames into nameserver entries
    pub fn from_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Self::new).collect()
    }
}

/// Desired state for one domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain name (may contain Unicode labels until [`punycode`](Self::punycode) runs)
    pub name: String,

    /// Desired records, in declaration order
    #[serde(default)]
    pub records: Vec<RecordConfig>,

    /// Desired delegation
    #[serde(default)]
    pub nameservers: Vec<Nameserver>,
}

impl DomainConfig {
    /// Create an empty domain configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            nameservers: Vec::new(),
        }
    }

    /// Add a record
    pub fn with_record(mut self, record: RecordConfig) -> Self {
        self.records.push(record);
        self
    }

    /// Set the desired nameservers
    pub fn with_nameservers(mut self, nameservers: Vec<Nameserver>) -> Self {
        self.nameservers = nameservers;
        self
    }

    /// Convert the domain name to its ASCII form and re-qualify every record
    ///
    /// Records keep their zone-relative name; the fully-qualified name is
    /// recomputed against the converted origin.
    pub fn punycode(&mut self) -> Result<()> {
        let unicode_name = self.name.clone();
        self.name = to_ascii(&unicode_name)?;

        for record in &mut self.records {
            let relative = trim_domain_name(&record.name_fqdn, &unicode_name);
            let fqdn = add_origin(&relative, &self.name);
            record.name_fqdn = to_ascii(&fqdn)?;
        }

        Ok(())
    }

    /// Keep only the records for which `keep` returns `true`
    pub fn filter<F>(&mut self, keep: F)
    where
        F: FnMut(&RecordConfig) -> bool,
    {
        self.records.retain(keep);
    }

    /// Desired nameserver hostnames
    pub fn nameserver_names(&self) -> Vec<String> {
        self.nameservers.iter().map(|ns| ns.name.clone()).collect()
    }
}
