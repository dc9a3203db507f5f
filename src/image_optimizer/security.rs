//! Image bomb protection
//!
//! Source dimensions are read from the header and checked before the
//! pixel buffer is allocated.

use serde::{Deserialize, Serialize};

use super::error::ImageError;
use crate::constants::{DEFAULT_MAX_SOURCE_EDGE, DEFAULT_MAX_SOURCE_PIXELS};

/// Limits applied to every source image before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLimits {
    /// Maximum allowed source image width
    #[serde(default = "default_max_source_edge")]
    pub max_source_width: u32,
    /// Maximum allowed source image height
    #[serde(default = "default_max_source_edge")]
    pub max_source_height: u32,
    /// Maximum allowed total pixels (width * height)
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
}

fn default_max_source_edge() -> u32 {
    DEFAULT_MAX_SOURCE_EDGE
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_source_width: DEFAULT_MAX_SOURCE_EDGE,
            max_source_height: DEFAULT_MAX_SOURCE_EDGE,
            max_source_pixels: DEFAULT_MAX_SOURCE_PIXELS,
        }
    }
}

/// Validate image dimensions against security limits
///
/// This should be called BEFORE fully decoding the image to protect
/// against "image bomb" attacks where a small file decompresses to
/// huge dimensions.
pub fn validate_dimensions(width: u32, height: u32, limits: &ImageLimits) -> Result<(), ImageError> {
    let pixels = width as u64 * height as u64;

    if width > limits.max_source_width
        || height > limits.max_source_height
        || pixels > limits.max_source_pixels
    {
        return Err(ImageError::over_limit(width, height, limits));
    }

    Ok(())
}
