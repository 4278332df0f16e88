//! Asset store
//!
//! A flat collection of uploaded audio files. There is no index: the
//! collection is whatever the backing store holds at call time.
//!
//! - **Naming**: `<upload timestamp millis>-<sanitized original filename>`
//! - **Backends**: [`FsAssetStore`] (one directory) and [`MemoryAssetStore`]
//!   (in-process, for tests)

mod error;
mod fs;
mod memory;


pub use error::StoreError;
pub use fs::FsAssetStore;
pub use memory::MemoryAssetStore;

use async_trait::async_trait;
use bytes::Bytes;
use rand::seq::IndexedRandom;

/// Attempts at finding a free name before an upload gives up
pub(crate) const MAX_NAME_ATTEMPTS: i64 = 16;

/// One file received by an upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            content: content.into(),
        }
    }
}

/// Storage backend for assets.
///
/// No locking is implied: concurrent uploads create independent names and
/// list/delete races simply see whatever is there.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store every file under a fresh name, returning the names in input order.
    /// Never overwrites an existing asset.
    async fn upload(&self, files: Vec<UploadedFile>) -> Result<Vec<String>, StoreError>;

    /// Names of all current assets. Order is backend-defined.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    async fn get(&self, name: &str) -> Result<Bytes, StoreError>;

    async fn delete(&self, name: &str) -> Result<(), StoreError>;

    /// Uniform pick over the current listing
    async fn pick_random(&self) -> Result<String, StoreError> {
        let names = self.list().await?;
        pick_random(&names).cloned().ok_or(StoreError::Empty)
    }
}

/// Uniform random choice, `None` when empty
pub fn pick_random<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::rng())
}

/// Build the stored name for an upload
pub fn asset_name(timestamp_millis: i64, original_name: &str) -> String {
    format!("{}-{}", timestamp_millis, clean_original_name(original_name))
}

/// Reduce a client-supplied filename to a single safe path component
fn clean_original_name(original_name: &str) -> String {
    let last = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let cleaned = sanitize_filename::sanitize(last);
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Whether `name` can address an asset (single component, no traversal)
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
