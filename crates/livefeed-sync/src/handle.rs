//! Shared read handles over one synchronizer instance.

use tokio::sync::watch;

use livefeed_core::error::SyncError;
use livefeed_entity::Snapshot;

use crate::synchronizer::SyncState;

/// A cheap, cloneable read handle onto a synchronizer's state.
///
/// Every UI consumer of a (user, scope) pair — the navbar badge, the
/// full list page — reads through handles onto the same instance, so
/// derived counts can never diverge between components.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    rx: watch::Receiver<SyncState>,
}

impl SyncHandle {
    pub(crate) fn new(rx: watch::Receiver<SyncState>) -> Self {
        Self { rx }
    }

    /// The current state.
    pub fn state(&self) -> SyncState {
        self.rx.borrow().clone()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.rx.borrow().snapshot.clone()
    }

    /// The current unviewed count, for badge rendering.
    pub fn unviewed_count(&self) -> usize {
        self.rx.borrow().snapshot.unviewed_count()
    }

    /// The last soft refresh failure, if any.
    pub fn last_error(&self) -> Option<SyncError> {
        self.rx.borrow().last_error.clone()
    }

    /// Wait until the state changes. Returns `Err` once the owning
    /// synchronizer is dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }
}
