//! Client configuration
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint that receives compiled queries
pub const DEFAULT_QUERY_PATH: &str = "/query";

/// Upper bound for request timeouts, in seconds
const MAX_TIMEOUT_SECS: u64 = 600;

/// Configuration for talking to the ledger API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API (e.g. `http://localhost:8000/api`)
    pub base_url: String,

    /// Path of the query endpoint, relative to `base_url`
    pub query_path: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Optional `User-Agent` header
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            query_path: DEFAULT_QUERY_PATH.to_string(),
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url`, everything else default
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url cannot be empty".to_string());
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }

        if !self.query_path.starts_with('/') {
            return Err(format!(
                "query_path must start with '/', got '{}'",
                self.query_path
            ));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(format!(
                "timeout_secs cannot exceed {}",
                MAX_TIMEOUT_SECS
            ));
        }

        Ok(())
    }
}
