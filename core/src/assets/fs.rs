//! Directory-backed asset store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{AssetStore, MAX_NAME_ATTEMPTS, StoreError, UploadedFile, asset_name, is_valid_name};

/// Asset store over a single flat directory. Each regular file is one asset.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Open the store, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|source| StoreError::Storage {
                op: "create directory",
                path: root.clone(),
                source,
            })?;
        tracing::debug!(root = %root.display(), "asset directory ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_name(name) {
            return Err(StoreError::not_found(name));
        }
        Ok(self.root.join(name))
    }

    /// Create a new file for `file`, bumping the timestamp on name clashes
    async fn write_new(&self, file: &UploadedFile) -> Result<String, StoreError> {
        let timestamp = Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = asset_name(timestamp + attempt, &file.original_name);
            let path = self.root.join(&name);

            let mut handle = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(handle) => handle,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => {
                    return Err(StoreError::Storage {
                        op: "create",
                        path,
                        source,
                    });
                }
            };

            let written = async {
                handle.write_all(&file.content).await?;
                handle.flush().await
            }
            .await;

            if let Err(source) = written {
                // Don't leave a truncated asset behind
                let _ = fs::remove_file(&path).await;
                return Err(StoreError::Storage {
                    op: "write",
                    path,
                    source,
                });
            }

            return Ok(name);
        }

        Err(StoreError::Storage {
            op: "create",
            path: self.root.join(asset_name(timestamp, &file.original_name)),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "no free asset name"),
        })
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn upload(&self, files: Vec<UploadedFile>) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::with_capacity(files.len());
        for file in &files {
            let name = self.write_new(file).await?;
            tracing::debug!(asset = %name, bytes = file.content.len(), "stored asset");
            names.push(name);
        }
        Ok(names)
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let read_dir_error = |source: std::io::Error| StoreError::Storage {
            op: "read directory",
            path: self.root.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.root).await.map_err(read_dir_error)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    async fn get(&self, name: &str) -> Result<Bytes, StoreError> {
        let path = self.path_for(name)?;
        // Subdirectories are not assets
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(StoreError::not_found(name)),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::not_found(name)),
            Err(source) => {
                return Err(StoreError::Storage {
                    op: "stat",
                    path,
                    source,
                });
            }
        }
        match fs::read(&path).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::not_found(name)),
            Err(source) => Err(StoreError::Storage {
                op: "read",
                path,
                source,
            }),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(asset = %name, "deleted asset");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::not_found(name)),
            Err(source) => Err(StoreError::Storage {
                op: "delete",
                path,
                source,
            }),
        }
    }
}
