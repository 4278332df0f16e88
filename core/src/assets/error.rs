//! Error types for asset store operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an [`AssetStore`](super::AssetStore)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("asset {name} not found")]
    NotFound { name: String },

    #[error("no assets available")]
    Empty,

    #[error("failed to {op} {path}")]
    Storage {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// True for both a missing name and a random pick on an empty store
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Empty)
    }
}
