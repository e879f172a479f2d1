//! Push-channel client for LiveFeed.
//!
//! Listens for the server's "something changed" signals over WebSocket
//! and forwards them to the synchronizer as
//! [`PushEvent`](livefeed_core::traits::PushEvent)s. The channel is a
//! low-latency hint, never the source of truth: polling continues
//! independently and a full refresh backs every unrecognized payload.

pub mod message;
pub mod state;
pub mod websocket;

pub use state::ConnectionState;
pub use websocket::WebSocketSource;
