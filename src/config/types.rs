//! Configuration types for the CLI front end

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::store::DEFAULT_NAMESPACE;

/// Top-level configuration, deserialized from config.toml.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub google: GoogleConfig,
    pub store: StoreConfig,
    pub resolver: ResolverConfig,
}

/// Google Places web service settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoogleConfig {
    /// API key; the external service is skipped when absent
    pub api_key: Option<String>,
    /// Response language (e.g. "en")
    pub language: Option<String>,
    /// Unrecognized provider options, passed through as query parameters
    pub params: BTreeMap<String, String>,
}

/// Persistent store settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Namespace for address records
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Resolution pipeline settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Queries shorter than this are suppressed client-side
    pub min_query_length: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { min_query_length: 3 }
    }
}
