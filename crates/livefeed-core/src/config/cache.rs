//! Local snapshot cache configuration.

use serde::{Deserialize, Serialize};

/// Local snapshot cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// File cache configuration.
    #[serde(default)]
    pub file: FileCacheConfig,
    /// In-memory cache configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            file: FileCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// File-backed cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCacheConfig {
    /// Directory holding one serialized snapshot per scope key.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

/// In-memory cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of cached snapshots.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// TTL for in-memory entries in seconds.
    #[serde(default = "default_memory_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_memory_ttl(),
        }
    }
}

fn default_provider() -> String {
    "file".to_string()
}

fn default_directory() -> String {
    "data/cache".to_string()
}

fn default_max_capacity() -> u64 {
    64
}

fn default_memory_ttl() -> u64 {
    86_400
}
