//! Snapshot store trait for pluggable local persistence.

use async_trait::async_trait;

use crate::result::SyncResult;

/// Trait for local snapshot persistence backends (file or in-memory).
///
/// All values are serialized as strings (JSON). One entry exists per
/// scope key; the store is a single-writer resource per key. Envelope
/// versioning and scope-key verification happen above this trait, in the
/// snapshot codec.
#[async_trait]
pub trait SnapshotStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load the serialized snapshot for a scope key.
    /// Returns `None` if no entry exists.
    async fn load(&self, key: &str) -> SyncResult<Option<String>>;

    /// Persist the serialized snapshot for a scope key, replacing any
    /// previous entry.
    async fn save(&self, key: &str, value: &str) -> SyncResult<()>;

    /// Remove the entry for a scope key.
    async fn remove(&self, key: &str) -> SyncResult<()>;

    /// Remove every entry. Used when the cache schema version changes.
    async fn clear(&self) -> SyncResult<()>;

    /// Load a typed value by deserializing from JSON.
    async fn load_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> SyncResult<Option<T>>
    where
        Self: Sized,
    {
        match self.load(key).await? {
            Some(value) => {
                let parsed = serde_json::from_str(&value)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Persist a typed value by serializing to JSON.
    async fn save_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> SyncResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.save(key, &json).await
    }
}
