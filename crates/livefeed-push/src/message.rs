//! Push-channel frame definitions and the item-or-hint decode rule.

use serde::{Deserialize, Serialize};

use livefeed_entity::Item;

/// Frames sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to a scope topic.
    Subscribe {
        /// Topic name, e.g. `"notifications/RH/SOC01"`.
        topic: String,
    },
    /// Pong response to an application-level server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Control frames sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlFrame {
    /// Subscription confirmed.
    Subscribed {
        /// Topic name.
        topic: String,
    },
    /// Application-level keepalive.
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Something changed; no usable item attached.
    Changed {},
}

/// A decoded server frame.
#[derive(Debug, Clone)]
pub enum Decoded {
    /// A control frame (keepalive, subscription ack, change hint).
    Control(ControlFrame),
    /// A full item payload.
    Item(Box<Item>),
    /// Unrecognized payload; treated as a change hint.
    Hint,
}

/// Decode a text frame.
///
/// Control frames are tagged; item frames are the bare item shape the
/// backend publishes on the topic. Anything else — including payloads
/// that stopped matching the item schema after a backend change — is a
/// hint, so the synchronizer falls back to a full refresh rather than
/// trusting a half-understood message.
pub fn decode_frame(text: &str) -> Decoded {
    if let Ok(frame) = serde_json::from_str::<ControlFrame>(text) {
        return Decoded::Control(frame);
    }
    if let Ok(item) = serde_json::from_str::<Item>(text) {
        return Decoded::Item(Box::new(item));
    }
    Decoded::Hint
}
