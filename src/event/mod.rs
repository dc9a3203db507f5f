//! Storage event notifications
//!
//! Only the fields needed to locate the created object are modelled.
//! Missing fields deserialize to empty values so that one malformed
//! record fails on its own instead of rejecting the whole batch.

use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

/// A batch of S3 event notification records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    #[serde(default)]
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: S3Bucket,
    #[serde(default)]
    pub object: S3Object,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Bucket {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Object {
    /// Percent-encoded key, with spaces sent as `+`
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl S3EventRecord {
    /// Convenience constructor for a created-object record
    pub fn object_created(bucket: &str, encoded_key: &str) -> Self {
        Self {
            event_name: "ObjectCreated:Put".to_string(),
            s3: S3Entity {
                bucket: S3Bucket {
                    name: bucket.to_string(),
                },
                object: S3Object {
                    key: encoded_key.to_string(),
                    size: None,
                },
            },
        }
    }
}

/// Location of the object a record refers to, with the key decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceObjectRef {
    pub bucket: String,
    pub key: String,
}

impl SourceObjectRef {
    pub fn from_record(record: &S3EventRecord) -> Result<Self, ProcessingError> {
        let bucket = record.s3.bucket.name.trim();
        if bucket.is_empty() {
            return Err(ProcessingError::InvalidRecord(
                "record has no bucket name".to_string(),
            ));
        }
        if record.s3.object.key.is_empty() {
            return Err(ProcessingError::InvalidRecord(
                "record has no object key".to_string(),
            ));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: decode_key(&record.s3.object.key)?,
        })
    }
}

/// Decode an event key: `+` is a space, then percent-escapes are resolved
///
/// A literal `+` in the original key arrives as `%2B` and survives.
pub fn decode_key(encoded: &str) -> Result<String, ProcessingError> {
    let spaced = encoded.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| {
            ProcessingError::InvalidRecord(format!("object key '{}' is not valid UTF-8: {}", encoded, e))
        })
}
