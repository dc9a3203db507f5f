//! Position calculation for watermark placement.
//!
//! The label is always anchored to the bottom-right corner. The computed
//! origin may be negative when the label is wider or taller than the
//! variant; drawing clips to the image.
//!
//! # Example
//!
//! ```
//! use kasasagi::watermark::position::{bottom_right, ImageDimensions, WatermarkDimensions};
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 100, height: 50 };
//!
//! let pos = bottom_right(&image, &watermark, 8);
//! assert_eq!((pos.x, pos.y), (692, 542)); // 800 - 100 - 8, 600 - 50 - 8
//! ```

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of the watermark in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Place the watermark `margin` pixels from the right and bottom edges.
pub fn bottom_right(
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    margin: u32,
) -> PlacementPosition {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let wm_w = watermark.width as i32;
    let wm_h = watermark.height as i32;
    let m = margin as i32;

    PlacementPosition::new(img_w - wm_w - m, img_h - wm_h - m)
}

/// Check if a position is at least partially visible within the image.
///
/// # Returns
///
/// `true` if any part of the watermark would be visible.
pub fn is_visible(
    pos: &PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> bool {
    let wm_right = pos.x + watermark.width as i32;
    let wm_bottom = pos.y + watermark.height as i32;

    pos.x < image.width as i32 && pos.y < image.height as i32 && wm_right > 0 && wm_bottom > 0
}
