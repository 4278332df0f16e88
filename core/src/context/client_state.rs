//! Persisted client state (tutorial flag + cached sound list)

use std::path::{Path, PathBuf};

pub use timer_sounds_types::ClientState;

use super::config::APP_NAME;
use super::error::ConfigError;

const STATE_NAME: &str = "state";

/// Location of the client's persisted state.
///
/// Every write is a read-modify-write of the whole file so the tutorial flag
/// and the sound cache never clobber each other.
#[derive(Debug, Clone)]
pub struct ClientStateFile {
    path: PathBuf,
}

impl ClientStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/timer-sounds/state.toml`
    pub fn default_location() -> Result<Self, ConfigError> {
        let path = confy::get_configuration_file_path(APP_NAME, STATE_NAME).map_err(|source| {
            ConfigError::Locate {
                name: STATE_NAME,
                source,
            }
        })?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ClientState, ConfigError> {
        confy::load_path(&self.path).map_err(|source| ConfigError::ReadState {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, state: &ClientState) -> Result<(), ConfigError> {
        confy::store_path(&self.path, state).map_err(|source| ConfigError::WriteState {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save_sounds(&self, sounds: &[String]) -> Result<(), ConfigError> {
        let mut state = self.load().unwrap_or_default();
        state.sounds = sounds.to_vec();
        self.save(&state)
    }

    pub fn mark_tutorial_seen(&self) -> Result<(), ConfigError> {
        let mut state = self.load().unwrap_or_default();
        state.tutorial_seen = true;
        self.save(&state)
    }
}
