//! Collector configuration
//!
//! A collector is described by an entry point, the fields and tags to
//! extract, and where to send the query. Configuration is deserialized with
//! serde; loading it from a file is left to the caller.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Configuration for a single collector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectorConfig {
    /// Measurement name for every record produced
    #[serde(default)]
    pub collector_name: String,

    /// Endpoint URL queries are posted to
    #[serde(default)]
    pub base_url: String,

    /// Unix socket to dial instead of the URL's host
    #[serde(default)]
    pub unix_socket: Option<String>,

    /// Path expression, e.g. `allRouters(name:"ComboEast")/nodes`
    #[serde(default)]
    pub entry_point: String,

    /// Field output name -> source path within each result node
    #[serde(default)]
    pub extract_fields: BTreeMap<String, String>,

    /// Tag output name -> source path within each result node
    #[serde(default)]
    pub extract_tags: BTreeMap<String, String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            collector_name: String::new(),
            base_url: String::new(),
            unix_socket: None,
            entry_point: String::new(),
            extract_fields: BTreeMap::new(),
            extract_tags: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl CollectorConfig {
    /// Check required values and normalize the base URL to end with '/'
    pub fn validate(mut self) -> Result<Self> {
        if self.collector_name.is_empty() {
            return Err(Error::MissingConfig("collector_name"));
        }
        if self.base_url.is_empty() {
            return Err(Error::MissingConfig("base_url"));
        }
        if self.entry_point.is_empty() {
            return Err(Error::MissingConfig("entry_point"));
        }
        if self.extract_fields.is_empty() {
            return Err(Error::MissingConfig("extract_fields"));
        }

        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
