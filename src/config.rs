//! Connection configuration for a Solr core.
//!
//! # Example
//!
//! ```
//! use solr_bridge::SolrConfig;
//!
//! // Minimal config (uses defaults)
//! let config = SolrConfig::new("localhost", "products");
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.core_url(), "http://localhost:8080/solr/products");
//!
//! // Full config
//! let config = SolrConfig {
//!     scheme: "https".into(),
//!     port: 8983,
//!     timeout_secs: 2,
//!     ..SolrConfig::new("search.internal", "products")
//! };
//! ```

use serde::Deserialize;

use crate::error::SolrError;

/// Connection settings for a single Solr core.
///
/// Passed explicitly into the client at construction time; there is no
/// process-wide registry. All fields except `host` and `core` have defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct SolrConfig {
    /// Engine hostname or IP (required)
    pub host: String,

    /// Core (index) name (required)
    pub core: String,

    /// URL scheme, "http" or "https"
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Engine port
    #[serde(default = "default_port")]
    pub port: u16,

    /// URL path prefix in front of the core name
    #[serde(default = "default_path")]
    pub path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Response writer requested from the engine. The mapper requires JSON.
    #[serde(default = "default_wt")]
    pub wt: String,
}

fn default_scheme() -> String { "http".to_string() }
fn default_port() -> u16 { 8080 }
fn default_path() -> String { "/solr/".to_string() }
fn default_timeout_secs() -> u64 { 5 }
fn default_wt() -> String { "json".to_string() }

impl SolrConfig {
    /// Create a config with the given host and core and default everything else.
    pub fn new(host: impl Into<String>, core: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            core: core.into(),
            scheme: default_scheme(),
            port: default_port(),
            path: default_path(),
            timeout_secs: default_timeout_secs(),
            wt: default_wt(),
        }
    }

    /// Check required fields and value ranges.
    pub fn validate(&self) -> Result<(), SolrError> {
        if self.host.is_empty() {
            return Err(SolrError::Config(
                "solr config needs at least a host configured".to_string(),
            ));
        }
        if self.core.is_empty() {
            return Err(SolrError::Config(
                "solr config needs at least a core configured".to_string(),
            ));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(SolrError::Config(
                "valid scheme settings are \"http\" and \"https\"".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL up to and including the path prefix, e.g.
    /// `http://localhost:8080/solr/`. The path is normalized to lead and
    /// trail with `/`.
    pub fn base_url(&self) -> String {
        let mut path = self.path.clone();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        format!("{}://{}:{}{}", self.scheme, self.host, self.port, path)
    }

    /// Full URL of the configured core, e.g. `http://localhost:8080/solr/products`.
    pub fn core_url(&self) -> String {
        format!("{}{}", self.base_url(), self.core)
    }
}
