//! Image optimization module
//!
//! Provides the image half of variant generation:
//! - Decoding into a canonical RGB working image, with image bomb limits
//! - Aspect-preserving downscale with a Lanczos3 filter
//! - JPEG encoding at a fixed quality
//! - The fixed set of variants and their destination keys

pub mod encoder;
pub mod error;
pub mod processor;
pub mod security;
pub mod variant;

pub use encoder::{EncodedImage, EncoderQuality, ImageEncoder, JpegEncoder};
pub use error::ImageError;
pub use processor::{decode_image, fit_within, resize_image};
pub use security::{validate_dimensions, ImageLimits};
pub use variant::{basename, is_variant_key, VariantSpec, MEDIUM, THUMB, VARIANTS};
