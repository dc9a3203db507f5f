//! Image processing error types
//!
//! Decode failures describe the source object; resample and encode
//! failures name the variant geometry or output format being produced.
//! All of them are folded into `ProcessingError` at the pipeline boundary.

use std::fmt;

use super::security::ImageLimits;

/// Why a source could not be turned into variant bytes
#[derive(Debug, Clone)]
pub enum ImageError {
    /// The source object has no bytes
    EmptySource,
    /// The bytes are not an image in any supported format, or are corrupt
    Unreadable { reason: String },
    /// Header dimensions are over the decode limits
    OverLimit {
        width: u32,
        height: u32,
        limits: ImageLimits,
    },
    /// Lanczos resampling to the variant size failed
    Resample {
        width: u32,
        height: u32,
        reason: String,
    },
    /// Writing the output format failed
    Encode { format: &'static str, reason: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::EmptySource => {
                write!(f, "Failed to decode image: source object is empty")
            }
            ImageError::Unreadable { reason } => write!(f, "Failed to decode image: {}", reason),
            ImageError::OverLimit {
                width,
                height,
                limits,
            } => write!(
                f,
                "Source image {}x{} is over the decode limit of {}x{} and {} pixels",
                width,
                height,
                limits.max_source_width,
                limits.max_source_height,
                limits.max_source_pixels
            ),
            ImageError::Resample {
                width,
                height,
                reason,
            } => write!(f, "Could not resample to {}x{}: {}", width, height, reason),
            ImageError::Encode { format, reason } => {
                write!(f, "Could not write {} output: {}", format, reason)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    pub fn unreadable(reason: impl Into<String>) -> Self {
        ImageError::Unreadable {
            reason: reason.into(),
        }
    }

    pub fn over_limit(width: u32, height: u32, limits: &ImageLimits) -> Self {
        ImageError::OverLimit {
            width,
            height,
            limits: *limits,
        }
    }

    pub fn resample(width: u32, height: u32, reason: impl Into<String>) -> Self {
        ImageError::Resample {
            width,
            height,
            reason: reason.into(),
        }
    }

    pub fn encode(format: &'static str, reason: impl Into<String>) -> Self {
        ImageError::Encode {
            format,
            reason: reason.into(),
        }
    }
}
