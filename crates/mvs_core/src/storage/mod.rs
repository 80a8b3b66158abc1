//! Object storage collaborators.
//!
//! The validation run reads the raw material from, and writes the
//! consolidated material to, an [`ObjectStore`] addressed by
//! [`ObjectLocator`]. Retries are left to the caller.

mod file_store;
mod locator;
mod memory;

pub use file_store::FileObjectStore;
pub use locator::{LocatorError, ObjectLocator};
pub use memory::MemoryObjectStore;

use std::io;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from object store operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    InvalidLocator(#[from] LocatorError),

    #[error("Object not found: {0}")]
    NotFound(ObjectLocator),

    #[error("I/O error in {operation} for {locator}: {source}")]
    Io {
        operation: &'static str,
        locator: ObjectLocator,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn io(operation: &'static str, locator: &ObjectLocator, source: io::Error) -> Self {
        Self::Io {
            operation,
            locator: locator.clone(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Where and as which version an object was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteReceipt {
    pub bucket: String,
    pub key: String,
    #[serde(rename = "ETag")]
    pub etag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

impl WriteReceipt {
    pub fn locator(&self) -> ObjectLocator {
        ObjectLocator::new(&self.bucket, &self.key)
    }
}

/// Key/locator addressed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full body of an object.
    async fn read_object(&self, locator: &ObjectLocator) -> StorageResult<Vec<u8>>;

    /// Store a JSON body, replacing any existing object.
    async fn write_object(
        &self,
        locator: &ObjectLocator,
        body: Vec<u8>,
    ) -> StorageResult<WriteReceipt>;
}

/// Hex MD5 of a body, quoted like an S3 ETag.
pub(crate) fn etag_for(body: &[u8]) -> String {
    format!("\"{:x}\"", md5::compute(body))
}
