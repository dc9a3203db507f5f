// Error types module

use thiserror::Error;

use crate::image_optimizer::ImageError;
use crate::storage::StorageError;
use crate::watermark::WatermarkError;

/// Coarse failure class of a record, used as a structured log field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRecord,
    Fetch,
    Decode,
    Encode,
    Upload,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRecord => "invalid_record",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Decode => "decode",
            ErrorKind::Encode => "encode",
            ErrorKind::Upload => "upload",
        }
    }
}

/// Failure of a single record, from trigger parsing to the last upload
///
/// Every variant is caught at the dispatcher's per-record boundary.
/// Notification failures are not represented here; see `notify::NotifyError`.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The trigger record is missing its bucket or key
    #[error("Invalid event record: {0}")]
    InvalidRecord(String),

    /// Source object could not be read
    #[error("Failed to fetch s3://{bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        source: StorageError,
    },

    /// Source bytes are not a decodable image, or exceed the pixel limits
    #[error(transparent)]
    Decode(ImageError),

    #[error("Failed to resize {variant} variant: {source}")]
    Resize {
        variant: String,
        source: ImageError,
    },

    #[error("Failed to watermark {variant} variant: {source}")]
    Watermark {
        variant: String,
        source: WatermarkError,
    },

    #[error("Failed to encode {variant} variant: {source}")]
    Encode {
        variant: String,
        source: ImageError,
    },

    /// Destination write failed; earlier variants stay uploaded
    #[error("Failed to upload s3://{bucket}/{key}: {source}")]
    Upload {
        bucket: String,
        key: String,
        source: StorageError,
    },
}

impl ProcessingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::InvalidRecord(_) => ErrorKind::InvalidRecord,
            ProcessingError::Fetch { .. } => ErrorKind::Fetch,
            ProcessingError::Decode(_) => ErrorKind::Decode,
            ProcessingError::Resize { .. }
            | ProcessingError::Watermark { .. }
            | ProcessingError::Encode { .. } => ErrorKind::Encode,
            ProcessingError::Upload { .. } => ErrorKind::Upload,
        }
    }
}
