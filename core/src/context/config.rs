//! Configuration persistence
//!
//! The config structs themselves live in timer-sounds-types; this module adds
//! confy-backed loading on top of them. confy writes the defaults out
//! when no file exists yet.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use timer_sounds_types::{APP_NAME, ClientConfig, ServerConfig};

use super::error::ConfigError;

/// Extension trait for config structs stored under the application's config dir
pub trait StoredConfig: Serialize + DeserializeOwned + Default {
    /// confy config name (file stem)
    const NAME: &'static str;

    /// Load, falling back to defaults when the file is unreadable
    fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(config = Self::NAME, error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, Self::NAME).map_err(ConfigError::Load)
    }
}

impl StoredConfig for ServerConfig {
    const NAME: &'static str = "server";
}

impl StoredConfig for ClientConfig {
    const NAME: &'static str = "client";
}
