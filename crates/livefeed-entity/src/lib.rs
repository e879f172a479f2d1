//! Domain entities for LiveFeed: items, categories, request statuses,
//! and the snapshot the synchronizer maintains.

pub mod item;
pub mod snapshot;

pub use item::{Category, Item, ItemId, RequestStatus};
pub use snapshot::{CachedSnapshot, MergeOutcome, Snapshot, SNAPSHOT_SCHEMA_VERSION};
