//! The LiveFeed synchronizer engine.
//!
//! One [`Synchronizer`] instance owns the snapshot for a (user, scope)
//! pair. It loads the persisted cache for instant render, refreshes from
//! the REST transport (immediately, then on a fixed poll interval, and
//! whenever the push channel hints at a change), and applies read-state
//! mutations optimistically. UI consumers read through cheap
//! [`SyncHandle`]s so a navbar badge and a full list page can never hold
//! divergent counts.

pub mod handle;
pub mod poller;
pub mod synchronizer;
pub mod views;

pub use handle::SyncHandle;
pub use synchronizer::{SyncState, Synchronizer};
pub use views::ItemFilter;
