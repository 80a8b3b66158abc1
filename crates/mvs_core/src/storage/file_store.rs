//! Filesystem-backed object store.
//!
//! Each bucket is a directory under the store root and each key a relative
//! path inside it. Writes go to a temp file first and are renamed into
//! place.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{etag_for, LocatorError, ObjectLocator, ObjectStore, StorageError, StorageResult, WriteReceipt};

#[derive(Debug, Clone)]
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of an object.
    ///
    /// Keys may not escape their bucket directory.
    pub fn object_path(&self, locator: &ObjectLocator) -> StorageResult<PathBuf> {
        let escapes = |s: &str| {
            Path::new(s)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        };
        if escapes(&locator.bucket) || escapes(&locator.key) {
            return Err(LocatorError::Unsupported(locator.to_string()).into());
        }
        Ok(self.root.join(&locator.bucket).join(&locator.key))
    }
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn read_object(&self, locator: &ObjectLocator) -> StorageResult<Vec<u8>> {
        let path = self.object_path(locator)?;
        match fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(locator.clone()))
            }
            Err(e) => Err(StorageError::io("read", locator, e)),
        }
    }

    async fn write_object(
        &self,
        locator: &ObjectLocator,
        body: Vec<u8>,
    ) -> StorageResult<WriteReceipt> {
        let path = self.object_path(locator)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io("create directory", locator, e))?;
        }

        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| StorageError::io("create", locator, e))?;
            file.write_all(&body)
                .await
                .map_err(|e| StorageError::io("write", locator, e))?;
            file.sync_all()
                .await
                .map_err(|e| StorageError::io("sync", locator, e))?;
        }

        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| StorageError::io("rename", locator, e))?;

        tracing::debug!("Stored {} bytes at {}", body.len(), path.display());

        Ok(WriteReceipt {
            bucket: locator.bucket.clone(),
            key: locator.key.clone(),
            etag: etag_for(&body),
            version_id: Some(Utc::now().format("%Y%m%dT%H%M%S%.6fZ").to_string()),
        })
    }
}
