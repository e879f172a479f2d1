//! The synchronizer: fetch/cache/merge engine and read-state mutations.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use livefeed_core::error::{ErrorKind, SyncError};
use livefeed_core::result::SyncResult;
use livefeed_core::traits::push::{PushEvent, PushSource};
use livefeed_core::traits::store::SnapshotStore;
use livefeed_core::traits::transport::ListTransport;
use livefeed_core::types::scope::Scope;
use livefeed_entity::{CachedSnapshot, Item, ItemId, Snapshot};
use livefeed_store::keys;

use crate::handle::SyncHandle;

/// What UI consumers observe: the snapshot plus soft failure state.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    /// The current snapshot.
    pub snapshot: Snapshot,
    /// The last refresh failure, cleared by the next successful refresh.
    /// Transport and server failures land here instead of the caller's
    /// render path.
    pub last_error: Option<SyncError>,
    /// Whether at least one refresh has completed against the server.
    pub initial_load_complete: bool,
}

impl SyncState {
    /// Whether the UI should surface a retry affordance: nothing cached
    /// to show and the fetch is failing. Transient failures with cached
    /// data stay silent.
    pub fn show_retry(&self) -> bool {
        self.last_error.is_some() && self.snapshot.is_empty() && !self.initial_load_complete
    }
}

/// Keeps a locally cached list of server-owned items consistent with
/// server state for one (user, scope) pair.
///
/// Owned explicitly and injected into consuming components; never a
/// module-level singleton read from ambient storage.
#[derive(Debug)]
pub struct Synchronizer {
    scope: Scope,
    transport: Arc<dyn ListTransport<Item>>,
    store: Arc<dyn SnapshotStore>,
    state_tx: watch::Sender<SyncState>,
    /// Held across the network round-trip so overlapping refresh
    /// requests coalesce instead of racing.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
}

impl Synchronizer {
    /// Create a synchronizer bound to a scope.
    ///
    /// Fails fast with `MissingScope` on an unusable scope; nothing is
    /// fetched yet.
    pub fn new(
        scope: Scope,
        transport: Arc<dyn ListTransport<Item>>,
        store: Arc<dyn SnapshotStore>,
        cancel: CancellationToken,
    ) -> SyncResult<Arc<Self>> {
        scope.validate()?;
        let (state_tx, _) = watch::channel(SyncState::default());
        Ok(Arc::new(Self {
            scope,
            transport,
            store,
            state_tx,
            refresh_lock: Mutex::new(()),
            cancel,
        }))
    }

    /// The scope this instance is bound to.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// A cheap read handle for UI consumers.
    pub fn handle(&self) -> SyncHandle {
        SyncHandle::new(self.state_tx.subscribe())
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.state_tx.borrow().snapshot.clone()
    }

    /// The last soft refresh failure, if the most recent refresh failed.
    pub fn last_error(&self) -> Option<SyncError> {
        self.state_tx.borrow().last_error.clone()
    }

    /// Whether the synchronizer has been torn down.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancelled future for loops driving this instance.
    pub(crate) async fn closed(&self) {
        self.cancel.cancelled().await;
    }

    /// Tear the synchronizer down: the polling loop, the push pump, and
    /// any in-flight refresh stop mutating state from this point on.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Seed state from the persisted cache, if a current-version entry
    /// for this exact scope exists. Corrupt or stale entries are
    /// discarded, never surfaced: the cache is a render warmup, not a
    /// source of truth.
    pub async fn init_from_cache(&self) {
        let key = keys::snapshot(&self.scope.cache_key());
        let raw = match self.store.load(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!(%key, "Failed to read snapshot cache: {e}");
                return;
            }
        };
        let envelope: CachedSnapshot = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(%key, "Discarding corrupt snapshot cache entry: {e}");
                let _ = self.store.remove(&key).await;
                return;
            }
        };
        match envelope.into_snapshot(&self.scope.cache_key()) {
            Some(snapshot) => {
                debug!(%key, items = snapshot.len(), "Seeded snapshot from cache");
                self.publish(|state| state.snapshot = snapshot);
            }
            None => {
                debug!(%key, "Discarding stale or foreign snapshot cache entry");
                let _ = self.store.remove(&key).await;
            }
        }
    }

    /// Fetch the authoritative list and replace the snapshot.
    ///
    /// Overlapping calls coalesce: a refresh requested while one is in
    /// flight joins the in-flight result instead of issuing a second
    /// network call. Transport, server, and decode failures leave the
    /// last-known-good snapshot visible and are recorded in
    /// [`SyncState::last_error`].
    pub async fn refresh(&self) -> SyncResult<Snapshot> {
        if self.is_closed() {
            return Err(SyncError::closed("refresh after teardown"));
        }
        match self.refresh_lock.try_lock() {
            Ok(_guard) => self.do_refresh().await,
            Err(_) => {
                // Join: wait for the in-flight refresh to finish, then
                // return whatever it produced.
                let _join = self.refresh_lock.lock().await;
                Ok(self.snapshot())
            }
        }
    }

    async fn do_refresh(&self) -> SyncResult<Snapshot> {
        self.scope.validate()?;

        let items = match self.transport.fetch_items(&self.scope).await {
            Ok(items) => items,
            Err(e) => return Err(self.record_failure(e)),
        };

        // The server count is a separate request used as a cross-check;
        // its failure is soft, the displayed count derives from the list.
        let server_count = match self.transport.fetch_unread_count(&self.scope).await {
            Ok(count) => Some(count),
            Err(e) => {
                debug!("Unread-count fetch failed, deriving from list: {e}");
                None
            }
        };

        if self.is_closed() {
            return Err(SyncError::closed("refresh resolved after teardown"));
        }

        // Items tagged for another scope can reach us through a shared
        // push channel or a misrouted response; they never enter the
        // snapshot.
        let in_scope: Vec<Item> = items
            .into_iter()
            .filter(|item| item.scope.matches(&self.scope))
            .collect();

        // Carry local read-state forward so an optimistic mark-read is
        // not silently reverted by a response that predates it
        // (last-writer-wins on `viewed`).
        let viewed = self.state_tx.borrow().snapshot.viewed_ids();
        let mut snapshot = Snapshot::from_items(in_scope, Utc::now());
        snapshot.preserve_viewed(&viewed);

        if let Some(server_count) = server_count {
            if server_count as usize != snapshot.unviewed_count() {
                debug!(
                    server_count,
                    derived = snapshot.unviewed_count(),
                    "Server unread count disagrees with item list"
                );
            }
        }

        self.publish(|state| {
            state.snapshot = snapshot.clone();
            state.last_error = None;
            state.initial_load_complete = true;
        });
        self.persist(&snapshot).await;
        Ok(snapshot)
    }

    /// Optimistically mark one item as read, then tell the server.
    ///
    /// The optimistic update is not reverted if the server call fails:
    /// the next refresh corrects any divergence. Preserving that
    /// at-least-eventually-consistent behavior is deliberate.
    pub async fn mark_read(&self, id: &ItemId) -> SyncResult<()> {
        if self.is_closed() {
            return Err(SyncError::closed("mark_read after teardown"));
        }
        if self.state_tx.borrow().snapshot.get(id).is_none() {
            return Err(SyncError::not_found(format!(
                "item '{id}' is not in the current snapshot"
            )));
        }

        self.publish(|state| {
            state.snapshot.mark_read(id);
        });
        let snapshot = self.snapshot();
        self.persist(&snapshot).await;

        self.transport.mark_read(&self.scope, id.as_str()).await
    }

    /// Optimistically mark every item as read, then tell the server.
    /// Safe to call when nothing is unread. Returns the count the server
    /// reports as updated.
    pub async fn mark_all_read(&self) -> SyncResult<u64> {
        if self.is_closed() {
            return Err(SyncError::closed("mark_all_read after teardown"));
        }

        self.publish(|state| {
            state.snapshot.mark_all_read();
        });
        let snapshot = self.snapshot();
        self.persist(&snapshot).await;

        self.transport.mark_all_read(&self.scope).await
    }

    /// Remove this scope's persisted cache entry. Called on logout or
    /// scope change so a stale cache is never shown to the next scope.
    pub async fn purge_cache(&self) -> SyncResult<()> {
        self.store.remove(&keys::snapshot(&self.scope.cache_key())).await
    }

    /// Apply one push event. In-scope items merge directly; hints and
    /// out-of-scope payloads fall back to a full refresh, since push
    /// payloads are hints rather than authoritative state.
    pub(crate) async fn apply_push(&self, event: PushEvent<Item>) {
        if self.is_closed() {
            return;
        }
        match event {
            PushEvent::Item(item) if item.scope.matches(&self.scope) => {
                debug!(id = %item.id, "Merging pushed item");
                self.publish(|state| {
                    state.snapshot.merge(item);
                });
                let snapshot = self.snapshot();
                self.persist(&snapshot).await;
            }
            PushEvent::Item(item) => {
                debug!(id = %item.id, "Pushed item is out of scope, refreshing");
                let _ = self.refresh().await;
            }
            PushEvent::Hint => {
                let _ = self.refresh().await;
            }
        }
    }

    /// Pump push events into the synchronizer until teardown or channel
    /// close. Push unavailability is never fatal: on subscribe failure
    /// the pump ends and polling remains the source of truth.
    pub async fn run_push_pump(self: Arc<Self>, source: Arc<dyn PushSource<Item>>) {
        let mut rx = match source.subscribe(&self.scope).await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Push channel unavailable, relying on polling: {e}");
                return;
            }
        };
        loop {
            tokio::select! {
                _ = self.closed() => break,
                event = rx.recv() => match event {
                    Some(event) => self.apply_push(event).await,
                    None => break,
                },
            }
        }
        debug!(scope = %self.scope.cache_key(), "Push pump stopped");
    }

    /// Spawn the polling loop and, when a push source is given, the push
    /// pump. Both stop on [`teardown`](Self::teardown).
    pub fn start(
        self: &Arc<Self>,
        interval: std::time::Duration,
        push: Option<Arc<dyn PushSource<Item>>>,
    ) {
        tokio::spawn(crate::poller::run(Arc::clone(self), interval));
        if let Some(source) = push {
            tokio::spawn(Arc::clone(self).run_push_pump(source));
        }
    }

    fn publish(&self, mutate: impl FnOnce(&mut SyncState)) {
        if self.is_closed() {
            return;
        }
        self.state_tx.send_modify(mutate);
    }

    /// Record a refresh failure. Soft kinds keep the last-known-good
    /// snapshot visible and land in `last_error`; decode mismatches are
    /// logged at error level since they may be an API contract change.
    fn record_failure(&self, err: SyncError) -> SyncError {
        if err.is_soft() {
            if err.kind == ErrorKind::MalformedResponse {
                error!("Refresh failed on response decode: {err}");
            } else {
                warn!("Refresh failed, keeping last-known-good snapshot: {err}");
            }
            self.publish(|state| state.last_error = Some(err.clone()));
        }
        err
    }

    async fn persist(&self, snapshot: &Snapshot) {
        if self.is_closed() {
            return;
        }
        let key = keys::snapshot(&self.scope.cache_key());
        let envelope = CachedSnapshot::new(snapshot, self.scope.cache_key());
        match serde_json::to_string(&envelope) {
            Ok(json) => {
                if let Err(e) = self.store.save(&key, &json).await {
                    warn!(%key, "Failed to persist snapshot: {e}");
                }
            }
            Err(e) => warn!(%key, "Failed to serialize snapshot: {e}"),
        }
    }
}
