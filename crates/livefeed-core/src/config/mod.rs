//! Library configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod cache;
pub mod http;
pub mod logging;
pub mod poll;
pub mod push;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::http::HttpConfig;
use self::logging::LoggingConfig;
use self::poll::PollConfig;
use self::push::PushConfig;

use crate::error::SyncError;

/// Root synchronizer configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// REST transport settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Polling scheduler settings.
    #[serde(default)]
    pub poll: PollConfig,
    /// Push-channel settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Local snapshot cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SyncConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `LIVEFEED__`.
    pub fn load(env: &str) -> Result<Self, SyncError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LIVEFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SyncError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| SyncError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
