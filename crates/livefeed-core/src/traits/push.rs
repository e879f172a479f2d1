//! Push-source trait for the out-of-band update channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::result::SyncResult;
use crate::types::scope::Scope;

/// An event delivered by the push channel.
///
/// Push payloads are hints, not authoritative state: a recognizable item
/// is merged after scope verification, anything else triggers a full
/// refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent<I> {
    /// The server pushed a recognizable item.
    Item(I),
    /// The server signalled "something changed" without a usable item.
    Hint,
}

/// Trait for a server-push transport (WebSocket, SSE).
///
/// Implementations own their connection lifecycle (handshake, keepalive,
/// reconnect backoff) and emit decoded events on the returned channel.
/// Dropping the receiver is the teardown signal: the implementation must
/// stop reconnecting and close the connection once its sends fail.
#[async_trait]
pub trait PushSource<I>: Send + Sync + std::fmt::Debug + 'static
where
    I: Send + 'static,
{
    /// Open the push channel for a scope and return the event stream.
    async fn subscribe(&self, scope: &Scope) -> SyncResult<mpsc::Receiver<PushEvent<I>>>;
}
