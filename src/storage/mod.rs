//! Object storage abstraction
//!
//! The dispatcher reads source objects and the pipeline writes variants
//! through the `ObjectStore` trait, so both can run against S3 in
//! production and against `MemoryObjectStore` in tests.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Storage operation errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Object not found")]
    NotFound,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Get/put access to a bucketed object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full content of `bucket/key`
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;

    /// Write `body` to `bucket/key`, replacing any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;
}
