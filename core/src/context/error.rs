//! Error types for context operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors during configuration and client state persistence
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to resolve configuration path for {name}")]
    Locate {
        name: &'static str,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to read state file {path}")]
    ReadState {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to write state file {path}")]
    WriteState {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },
}
