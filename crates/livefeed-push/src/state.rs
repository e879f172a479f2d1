//! Push-channel connection state machine.

use serde::{Deserialize, Serialize};

/// Connection state of the push channel.
///
/// `Disconnected -> Connecting -> Connected -> Disconnected`, cycling
/// through reconnects while the owner is alive. Teardown closes the
/// channel from any state and is the only terminal transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection; a reconnect may be scheduled.
    #[default]
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Handshake done, subscribed to the scope topic.
    Connected,
}

impl ConnectionState {
    /// Whether moving to `next` is a legal transition.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting)
                | (Self::Connecting, Self::Connected)
                | (Self::Connecting, Self::Disconnected)
                | (Self::Connected, Self::Disconnected)
        )
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        write!(f, "{label}")
    }
}
