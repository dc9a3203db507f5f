//! In-memory object store (HashMap storage) for tests and dry runs

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{ObjectStore, StorageError, StorageResult};

/// A stored object and the content type it was written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// Object store that keeps everything in memory
///
/// Clones share the same underlying map. Reads and writes of individual
/// keys can be made to fail to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
    put_log: Arc<RwLock<Vec<(String, String)>>>,
    failing_gets: Arc<RwLock<HashSet<String>>>,
    failing_puts: Arc<RwLock<HashSet<String>>>,
    simulate_access_denied: Arc<RwLock<bool>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through `put_object`
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys currently stored in `bucket`, sorted
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Every successful `put_object` call as (bucket, key), in call order
    pub fn put_log(&self) -> Vec<(String, String)> {
        self.put_log.read().clone()
    }

    /// Make `get_object` of `key` fail with a backend error
    pub fn fail_get(&self, key: &str) {
        self.failing_gets.write().insert(key.to_string());
    }

    /// Make `put_object` of `key` fail with a backend error
    pub fn fail_put(&self, key: &str) {
        self.failing_puts.write().insert(key.to_string());
    }

    /// Enable access denied simulation for every operation
    pub fn set_access_denied(&self, enabled: bool) {
        *self.simulate_access_denied.write() = enabled;
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        if *self.simulate_access_denied.read() {
            return Err(StorageError::AccessDenied(
                "Simulated access denied".to_string(),
            ));
        }
        if self.failing_gets.read().contains(key) {
            return Err(StorageError::Backend(format!(
                "Simulated read failure for {}",
                key
            )));
        }

        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.body.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        if *self.simulate_access_denied.read() {
            return Err(StorageError::AccessDenied(
                "Simulated access denied".to_string(),
            ));
        }
        if self.failing_puts.read().contains(key) {
            return Err(StorageError::Backend(format!(
                "Simulated write failure for {}",
                key
            )));
        }

        self.objects.write().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        self.put_log
            .write()
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}
