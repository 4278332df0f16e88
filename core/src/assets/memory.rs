//! In-memory asset store, used by tests and the server's `--in-memory` mode

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{AssetStore, MAX_NAME_ATTEMPTS, StoreError, UploadedFile, asset_name, is_valid_name};

/// Assets kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(&self, files: Vec<UploadedFile>) -> Result<Vec<String>, StoreError> {
        let mut assets = self.assets.lock().await;
        let mut names = Vec::with_capacity(files.len());

        for file in files {
            let timestamp = Utc::now().timestamp_millis();
            let name = (0..MAX_NAME_ATTEMPTS)
                .map(|attempt| asset_name(timestamp + attempt, &file.original_name))
                .find(|candidate| !assets.iter().any(|(existing, _)| existing == candidate))
                .ok_or_else(|| StoreError::Storage {
                    op: "create",
                    path: asset_name(timestamp, &file.original_name).into(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "no free asset name",
                    ),
                })?;

            assets.push((name.clone(), file.content));
            names.push(name);
        }

        Ok(names)
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let assets = self.assets.lock().await;
        Ok(assets.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn get(&self, name: &str) -> Result<Bytes, StoreError> {
        let assets = self.assets.lock().await;
        assets
            .iter()
            .find(|(existing, _)| is_valid_name(name) && existing == name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StoreError::not_found(name))
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut assets = self.assets.lock().await;
        let index = assets
            .iter()
            .position(|(existing, _)| is_valid_name(name) && existing == name)
            .ok_or_else(|| StoreError::not_found(name))?;
        assets.remove(index);
        Ok(())
    }
}
