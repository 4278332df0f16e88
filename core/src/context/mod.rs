mod client_state;
mod config;
mod error;

pub use client_state::ClientStateFile;
pub use config::StoredConfig;
pub use error::ConfigError;
