//! LiveFeed — a client-side live-list synchronizer.
//!
//! Keeps a locally cached, filterable list of server-owned records (HR
//! notifications and workflow requests) consistent with server state
//! through three channels: the persisted local cache for instant render,
//! periodic polling of the REST API, and a WebSocket push channel used
//! as a low-latency hint. Read-state mutations apply optimistically and
//! reconcile with the server on the next refresh.
//!
//! This facade crate wires the production pieces together; the engine
//! itself only knows the [`ListTransport`], [`SnapshotStore`], and
//! [`PushSource`] trait seams, so embedders and tests can swap any of
//! them out.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

pub use livefeed_core::config::{self, SyncConfig};
pub use livefeed_core::error::{ErrorKind, SyncError};
pub use livefeed_core::result::SyncResult;
pub use livefeed_core::traits::{ListTransport, PushEvent, PushSource, SnapshotStore};
pub use livefeed_core::types::{DateRange, ReadFilter, Role, Scope, ScopeTag};
pub use livefeed_entity::{
    CachedSnapshot, Category, Item, ItemId, MergeOutcome, RequestStatus, Snapshot,
    SNAPSHOT_SCHEMA_VERSION,
};
pub use livefeed_push::{ConnectionState, WebSocketSource};
pub use livefeed_store::{keys as store_keys, FileSnapshotStore, MemorySnapshotStore};
pub use livefeed_transport::HttpTransport;
pub use livefeed_sync::{views, ItemFilter, SyncHandle, SyncState, Synchronizer};

use livefeed_core::config::logging::LoggingConfig;

/// Initialize tracing/logging for an embedding application.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// A fully wired synchronizer: HTTP transport, configured snapshot
/// store, WebSocket push source, polling loop.
///
/// One runtime exists per (user, scope) pair; every UI consumer reads
/// through [`SyncHandle`]s onto the same instance.
#[derive(Debug)]
pub struct SyncRuntime {
    synchronizer: Arc<Synchronizer>,
    cancel: CancellationToken,
    config: SyncConfig,
}

impl SyncRuntime {
    /// Wire a runtime from configuration. Nothing is fetched or spawned
    /// yet; call [`start`](Self::start).
    pub fn new(config: SyncConfig, scope: Scope) -> SyncResult<Self> {
        let cancel = CancellationToken::new();

        let transport: Arc<dyn ListTransport<Item>> =
            Arc::new(livefeed_transport::HttpTransport::new(&config.http)?);

        let store: Arc<dyn SnapshotStore> = match config.cache.provider.as_str() {
            "memory" => Arc::new(MemorySnapshotStore::new(&config.cache.memory)),
            _ => Arc::new(FileSnapshotStore::new(&config.cache.file)),
        };

        let synchronizer = Synchronizer::new(scope, transport, store, cancel.child_token())?;

        Ok(Self {
            synchronizer,
            cancel,
            config,
        })
    }

    /// Seed state from the persisted cache, then spawn the polling loop
    /// (immediate first refresh) and the push pump.
    pub async fn start(&self) {
        self.synchronizer.init_from_cache().await;

        let push: Arc<dyn PushSource<Item>> = Arc::new(WebSocketSource::new(
            self.config.push.clone(),
            self.cancel.child_token(),
        ));
        self.synchronizer
            .start(self.config.poll.interval(), Some(push));
    }

    /// The owned synchronizer, for mutations and direct reads.
    pub fn synchronizer(&self) -> &Arc<Synchronizer> {
        &self.synchronizer
    }

    /// A cheap read handle for a UI consumer.
    pub fn handle(&self) -> SyncHandle {
        self.synchronizer.handle()
    }

    /// Tear everything down: polling, push channel, in-flight work. No
    /// state mutation is observable afterwards.
    pub fn shutdown(&self) {
        self.synchronizer.teardown();
        self.cancel.cancel();
    }

    /// Shutdown and additionally drop this scope's persisted cache
    /// entry. Used on logout or role change so the next scope can never
    /// see this one's data.
    pub async fn shutdown_and_purge(&self) -> SyncResult<()> {
        let purge = self.synchronizer.purge_cache().await;
        self.shutdown();
        purge
    }
}
