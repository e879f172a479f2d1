//! WebSocket push source over tokio-tungstenite.
//!
//! Owns the connection lifecycle: handshake, scope-topic subscription,
//! keepalive answering, and a fixed-backoff reconnect loop. The loop
//! ends only on teardown (cancellation) or when the consumer drops the
//! event receiver.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use livefeed_core::config::push::PushConfig;
use livefeed_core::result::SyncResult;
use livefeed_core::traits::push::{PushEvent, PushSource};
use livefeed_core::types::scope::Scope;
use livefeed_entity::Item;

use crate::message::{decode_frame, ClientFrame, ControlFrame, Decoded};
use crate::state::ConnectionState;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket-backed [`PushSource`].
#[derive(Debug)]
pub struct WebSocketSource {
    config: PushConfig,
    cancel: CancellationToken,
    state_tx: watch::Sender<ConnectionState>,
}

impl WebSocketSource {
    /// Create a source. `cancel` is the teardown signal shared with the
    /// owning synchronizer; once cancelled, no reconnect is ever
    /// scheduled again.
    pub fn new(config: PushConfig, cancel: CancellationToken) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            cancel,
            state_tx,
        }
    }

    /// Observe connection state transitions.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }
}

#[async_trait]
impl PushSource<Item> for WebSocketSource {
    async fn subscribe(&self, scope: &Scope) -> SyncResult<mpsc::Receiver<PushEvent<Item>>> {
        scope.validate()?;
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let worker = Worker {
            url: self.config.url.clone(),
            topic: scope.topic(),
            reconnect_delay: self.config.reconnect_delay(),
            cancel: self.cancel.clone(),
            state_tx: self.state_tx.clone(),
            tx,
        };
        tokio::spawn(worker.run());
        Ok(rx)
    }
}

struct Worker {
    url: String,
    topic: String,
    reconnect_delay: std::time::Duration,
    cancel: CancellationToken,
    state_tx: watch::Sender<ConnectionState>,
    tx: mpsc::Sender<PushEvent<Item>>,
}

impl Worker {
    fn set_state(&self, next: ConnectionState) {
        self.state_tx.send_replace(next);
    }

    async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            self.set_state(ConnectionState::Connecting);

            let keep_running = match connect_async(self.url.as_str()).await {
                Ok((socket, _)) => {
                    debug!(topic = %self.topic, "Push channel connected");
                    self.set_state(ConnectionState::Connected);
                    self.serve(socket).await
                }
                Err(e) => {
                    warn!(url = %self.url, "Push channel handshake failed: {e}");
                    true
                }
            };

            self.set_state(ConnectionState::Disconnected);
            if !keep_running {
                break;
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(self.reconnect_delay) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        debug!(topic = %self.topic, "Push channel closed");
    }

    /// Serve one established connection. Returns `false` when the worker
    /// must stop for good (teardown or dropped receiver), `true` to
    /// reconnect after backoff.
    async fn serve(&self, socket: Socket) -> bool {
        let (mut sink, mut stream) = socket.split();

        let subscribe = ClientFrame::Subscribe {
            topic: self.topic.clone(),
        };
        let frame = match serde_json::to_string(&subscribe) {
            Ok(json) => Message::Text(json.into()),
            Err(e) => {
                warn!("Failed to encode subscribe frame: {e}");
                return true;
            }
        };
        if sink.send(frame).await.is_err() {
            return true;
        }

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return false;
                }
                incoming = stream.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            if !self.handle_text(text.as_str(), &mut sink).await {
                                return false;
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            if sink.send(Message::Pong(payload)).await.is_err() {
                                return true;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => return true,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("Push channel read error: {e}");
                            return true;
                        }
                    }
                }
            }
        }
    }

    /// Decode one text frame and forward the resulting event. Returns
    /// `false` when the event receiver is gone.
    async fn handle_text(
        &self,
        text: &str,
        sink: &mut futures::stream::SplitSink<Socket, Message>,
    ) -> bool {
        let event = match decode_frame(text) {
            Decoded::Control(ControlFrame::Ping { timestamp }) => {
                let pong = ClientFrame::Pong { timestamp };
                if let Ok(json) = serde_json::to_string(&pong) {
                    let _ = sink.send(Message::Text(json.into())).await;
                }
                return true;
            }
            Decoded::Control(ControlFrame::Subscribed { topic }) => {
                debug!(%topic, "Push subscription confirmed");
                return true;
            }
            Decoded::Control(ControlFrame::Changed {}) | Decoded::Hint => PushEvent::Hint,
            Decoded::Item(item) => PushEvent::Item(*item),
        };
        self.tx.send(event).await.is_ok()
    }
}
