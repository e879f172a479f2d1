//! Trait seams between the synchronizer engine and its collaborators.

pub mod push;
pub mod store;
pub mod transport;

pub use push::{PushEvent, PushSource};
pub use store::SnapshotStore;
pub use transport::ListTransport;
