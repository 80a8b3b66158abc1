//! In-memory object store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{etag_for, ObjectLocator, ObjectStore, StorageError, StorageResult, WriteReceipt};

/// Object store holding bodies in a map, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<ObjectLocator, Vec<u8>>>,
    writes: Mutex<u64>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, locator: ObjectLocator, body: Vec<u8>) {
        self.objects.lock().insert(locator, body);
    }

    pub fn insert_json(&self, locator: ObjectLocator, value: &Value) {
        self.insert(locator, value.to_string().into_bytes());
    }

    pub fn get(&self, locator: &ObjectLocator) -> Option<Vec<u8>> {
        self.objects.lock().get(locator).cloned()
    }

    pub fn get_json(&self, locator: &ObjectLocator) -> Option<Value> {
        self.get(locator)
            .and_then(|body| serde_json::from_slice(&body).ok())
    }

    /// Number of completed writes.
    pub fn write_count(&self) -> u64 {
        *self.writes.lock()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn read_object(&self, locator: &ObjectLocator) -> StorageResult<Vec<u8>> {
        self.get(locator)
            .ok_or_else(|| StorageError::NotFound(locator.clone()))
    }

    async fn write_object(
        &self,
        locator: &ObjectLocator,
        body: Vec<u8>,
    ) -> StorageResult<WriteReceipt> {
        let etag = etag_for(&body);
        self.insert(locator.clone(), body);

        let mut writes = self.writes.lock();
        *writes += 1;

        Ok(WriteReceipt {
            bucket: locator.bucket.clone(),
            key: locator.key.clone(),
            etag,
            version_id: Some(writes.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn stores_and_counts_writes() {
        let store = MemoryObjectStore::new();
        let loc = ObjectLocator::new("b", "k.json");

        assert!(store.read_object(&loc).await.is_err());

        let receipt = store.write_object(&loc, b"{\"a\":1}".to_vec()).await.unwrap();
        assert_eq!(receipt.version_id.as_deref(), Some("1"));
        assert_eq!(store.get_json(&loc), Some(json!({ "a": 1 })));
        assert_eq!(store.write_count(), 1);
    }
}
