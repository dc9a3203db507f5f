//! S3-backed object store using the AWS SDK

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::time::Instant;

use super::{ObjectStore, StorageError, StorageResult};

/// Object store backed by an `aws_sdk_s3::Client`
///
/// One instance is shared by every record of every invocation.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(str::to_owned);
    let message = DisplayErrorContext(&err).to_string();

    match code.as_deref() {
        Some("NoSuchKey") | Some("NotFound") => StorageError::NotFound,
        Some("AccessDenied") | Some("Forbidden") => StorageError::AccessDenied(message),
        _ => StorageError::Backend(message),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let start = Instant::now();

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read object body: {}", e)))?
            .into_bytes();

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(body)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let start = Instant::now();
        let size = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}
