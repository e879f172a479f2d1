//! Snapshot store backends for LiveFeed.
//!
//! Two [`SnapshotStore`](livefeed_core::traits::SnapshotStore)
//! implementations: a file-backed store (the durable default, one JSON
//! document per scope key) and an in-memory store for short-lived
//! embedders and tests.

pub mod file;
pub mod keys;
pub mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
