//! Image encoder abstraction
//!
//! Variants are always written as JPEG. The trait keeps the encoding
//! step swappable for tests and benchmarks.

use image::RgbImage;

use super::error::ImageError;
use crate::constants::{DEFAULT_JPEG_QUALITY, VARIANT_CONTENT_TYPE};

/// Quality settings for image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// Quality value (1-100, where 100 is best quality)
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl EncoderQuality {
    /// Create quality settings with specified quality level
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// Content-Type written with the object
    pub content_type: &'static str,
    /// Encoded dimensions (width, height)
    pub dimensions: (u32, u32),
}

/// Trait for image encoders
pub trait ImageEncoder: Send + Sync {
    /// Short format name used in error messages
    fn format_name(&self) -> &'static str;

    /// Encode an opaque RGB image
    fn encode(&self, image: &RgbImage, quality: EncoderQuality) -> Result<EncodedImage, ImageError>;
}

/// JPEG encoder using the image crate
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format_name(&self) -> &'static str {
        "jpeg"
    }

    fn encode(&self, image: &RgbImage, quality: EncoderQuality) -> Result<EncodedImage, ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        let (width, height) = image.dimensions();
        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.quality);

        encoder
            .write_image(image.as_raw(), width, height, image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode(self.format_name(), e.to_string()))?;

        Ok(EncodedImage {
            data: output.into_inner(),
            content_type: VARIANT_CONTENT_TYPE,
            dimensions: (width, height),
        })
    }
}
