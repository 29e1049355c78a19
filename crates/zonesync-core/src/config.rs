//! Configuration types for zonesync
//!
//! This module defines the provider, retry and reconciler settings, plus the
//! JSON credentials file they are usually built from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::retry::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};

/// Main reconciler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Provider hosting the zone records
    pub dns_provider: ProviderConfig,

    /// Registrar managing the delegation (optional)
    #[serde(default)]
    pub registrar: Option<ProviderConfig>,

    /// Whether corrections are only reported or also executed
    #[serde(default)]
    pub mode: RunMode,

    /// Capacity of the reconciler event channel
    ///
    /// When full, events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl ReconcileConfig {
    /// Create a preview-mode configuration for a single provider
    pub fn new(dns_provider: ProviderConfig) -> Self {
        Self {
            dns_provider,
            registrar: None,
            mode: RunMode::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.dns_provider.validate()?;
        if let Some(registrar) = &self.registrar {
            registrar.validate()?;
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

/// Reconciliation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Compute and report corrections without executing them
    #[default]
    Preview,
    /// Compute and execute corrections
    Push,
}

/// Provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Namecheap (DNS hosting and registrar)
    Namecheap {
        /// API user name
        api_user: String,
        /// API key
        api_key: String,
        /// Alternative API endpoint (e.g. the sandbox)
        #[serde(default)]
        base_url: Option<String>,
        /// Rate-limit retry settings
        #[serde(default)]
        retry: RetryConfig,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Build a provider configuration from a flat credentials map
    ///
    /// Namecheap reads the `apiuser`, `apikey` and optional `BaseURL` keys.
    /// Any other provider type becomes [`ProviderConfig::Custom`] carrying the
    /// map as JSON.
    pub fn from_credentials(
        provider_type: &str,
        credentials: &HashMap<String, String>,
    ) -> Result<Self> {
        let config = match provider_type.to_lowercase().as_str() {
            "namecheap" => ProviderConfig::Namecheap {
                api_user: credentials.get("apiuser").cloned().unwrap_or_default(),
                api_key: credentials.get("apikey").cloned().unwrap_or_default(),
                base_url: credentials.get("BaseURL").cloned(),
                retry: RetryConfig::default(),
            },
            other => ProviderConfig::Custom {
                factory: other.to_string(),
                config: serde_json::to_value(credentials)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::Namecheap {
                api_user,
                api_key,
                base_url,
                retry,
            } => {
                if api_user.is_empty() || api_key.is_empty() {
                    return Err(Error::config("Namecheap apikey and apiuser must be provided"));
                }
                if let Some(url) = base_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(Error::config(format!(
                        "Namecheap BaseURL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                retry.validate()
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Namecheap { .. } => "namecheap",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

// Credentials never reach logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Namecheap {
                api_user,
                base_url,
                retry,
                ..
            } => f
                .debug_struct("Namecheap")
                .field("api_user", api_user)
                .field("api_key", &"<REDACTED>")
                .field("base_url", base_url)
                .field("retry", retry)
                .finish(),
            ProviderConfig::Custom { factory, .. } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Rate-limit retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total invocations of a rate-limited call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Fixed wait between attempts (in seconds)
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

impl RetryConfig {
    /// Validate the retry settings
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::config("Retry max_attempts must be >= 1"));
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

/// Credentials file keyed by provider entry name
///
/// ```json
/// {
///   "namecheap": { "apiuser": "alice", "apikey": "..." }
/// }
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CredentialsFile {
    entries: HashMap<String, HashMap<String, String>>,
}

impl CredentialsFile {
    /// Load a credentials file from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::config(format!(
                "Failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&raw)
    }

    /// Parse credentials from a JSON string
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Entry names present in the file
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build the provider configuration for one entry
    ///
    /// # Parameters
    ///
    /// - `entry`: Entry name in the file
    /// - `provider_type`: Provider type the entry configures (e.g. "namecheap")
    pub fn provider_config(&self, entry: &str, provider_type: &str) -> Result<ProviderConfig> {
        let credentials = self
            .entries
            .get(entry)
            .ok_or_else(|| Error::config(format!("No credentials entry named '{}'", entry)))?;
        ProviderConfig::from_credentials(provider_type, credentials)
    }
}

impl fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsFile")
            .field("entries", &self.entry_names())
            .finish()
    }
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_secs() -> u64 {
    DEFAULT_BACKOFF.as_secs()
}

fn default_event_channel_capacity() -> usize {
    100
}
