// Constants module - centralized default values for configuration
//
// Output layout and rendering parameters are fixed; downstream consumers
// depend on the variant key prefixes and the JPEG content type.

// =============================================================================
// Variant defaults
// =============================================================================

/// Thumbnail bounding box edge in pixels
pub const THUMB_MAX_EDGE: u32 = 128;

/// Medium bounding box edge in pixels
pub const MEDIUM_MAX_EDGE: u32 = 512;

/// JPEG quality for every variant (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Content type written with every variant
pub const VARIANT_CONTENT_TYPE: &str = "image/jpeg";

// =============================================================================
// Watermark defaults
// =============================================================================

/// Label rendered onto every variant
pub const DEFAULT_WATERMARK_TEXT: &str = "YourSite";

/// Font size of the label in pixels
pub const DEFAULT_WATERMARK_FONT_SIZE: f32 = 12.0;

/// Distance from the right and bottom edges in pixels
pub const DEFAULT_WATERMARK_MARGIN: u32 = 8;

/// Alpha of the label fill (out of 255)
pub const DEFAULT_WATERMARK_ALPHA: u8 = 150;

// =============================================================================
// Security defaults
// =============================================================================

/// Maximum decoded source pixels before the image is rejected as a bomb
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 178_956_970;

/// Maximum width or height of a source image
pub const DEFAULT_MAX_SOURCE_EDGE: u32 = 65_535;

// =============================================================================
// Notification defaults
// =============================================================================

pub const SUBJECT_PROCESSED: &str = "Image processed";

pub const SUBJECT_FAILED: &str = "Image processing failed";

/// Key reported when a record carries no usable key
pub const UNKNOWN_KEY: &str = "<unknown>";

// =============================================================================
// Logging defaults
// =============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";
