//! REST transport configuration.

use serde::{Deserialize, Serialize};

/// REST transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the item API, e.g. `"https://portal.example.com"`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Bearer token attached to every request, if any.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
            auth_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    10_000
}
