//! File-backed snapshot store: one JSON document per scope key.
//!
//! This is the durable default, the client-side analogue of browser
//! storage. Writes go to a temporary file first and are renamed into
//! place, so a crash mid-write never leaves a torn document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use livefeed_core::config::cache::FileCacheConfig;
use livefeed_core::error::SyncError;
use livefeed_core::result::SyncResult;
use livefeed_core::traits::store::SnapshotStore;

/// File-backed snapshot store rooted at a configured directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    directory: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store from configuration. The directory is created
    /// lazily on first write.
    pub fn new(config: &FileCacheConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
        }
    }

    /// Create a store rooted at an explicit directory.
    pub fn at(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys contain ':' which is not filename-safe everywhere. A
        // sanitized name may collide across keys in theory; the envelope
        // scope-key check above this store rejects any such crossover.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            })
            .collect();
        self.directory.join(format!("{name}.json"))
    }

    async fn ensure_directory(&self) -> SyncResult<()> {
        fs::create_dir_all(&self.directory).await.map_err(|e| {
            SyncError::with_source(
                livefeed_core::error::ErrorKind::Cache,
                format!("Failed to create cache directory {:?}", self.directory),
                e,
            )
        })
    }
}

async fn read_if_exists(path: &Path) -> SyncResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> SyncResult<Option<String>> {
        read_if_exists(&self.path_for(key)).await
    }

    async fn save(&self, key: &str, value: &str) -> SyncResult<()> {
        self.ensure_directory().await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        debug!(key, ?path, "Persisted snapshot");
        Ok(())
    }

    async fn remove(&self, key: &str) -> SyncResult<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> SyncResult<()> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0u32;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        debug!(removed, "Cleared snapshot cache directory");
        Ok(())
    }
}
