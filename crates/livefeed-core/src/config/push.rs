//! Push-channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Push-channel (WebSocket) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// WebSocket endpoint URL, e.g. `"ws://portal.example.com/ws"`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Delay before reconnecting after an error or close, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Internal event channel buffer size.
    #[serde(default = "default_buffer")]
    pub channel_buffer_size: usize,
}

impl PushConfig {
    /// The reconnect backoff as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            reconnect_delay_ms: default_reconnect_delay(),
            channel_buffer_size: default_buffer(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

fn default_reconnect_delay() -> u64 {
    5_000
}

fn default_buffer() -> usize {
    256
}
