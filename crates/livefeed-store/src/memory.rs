//! In-memory snapshot store using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use livefeed_core::config::cache::MemoryCacheConfig;
use livefeed_core::result::SyncResult;
use livefeed_core::traits::store::SnapshotStore;

/// In-memory snapshot store.
///
/// Entries evaporate with the process; useful for tests and for
/// embedders that treat the cache as a render-warmup only.
#[derive(Debug, Clone)]
pub struct MemorySnapshotStore {
    cache: Cache<String, String>,
}

impl MemorySnapshotStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();
        Self { cache }
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn save(&self, key: &str, value: &str) -> SyncResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> SyncResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn clear(&self) -> SyncResult<()> {
        self.cache.invalidate_all();
        Ok(())
    }
}
