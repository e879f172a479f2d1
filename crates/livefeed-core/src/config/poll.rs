//! Polling scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Polling scheduler configuration.
///
/// Deployments typically poll between 2 and 10 seconds depending on item
/// type; the interval is a configurable, never a hardcoded constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Interval between periodic refreshes in milliseconds.
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

impl PollConfig {
    /// The poll interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
        }
    }
}

fn default_interval() -> u64 {
    5_000
}
