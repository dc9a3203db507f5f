//! Watermark module for stamping a text label onto image variants.
//!
//! Every variant receives the same label: rendered onto a transparent
//! overlay the size of the variant, then composited onto the opaque image.
//! The margin is measured from the visible ink of the label, not from its
//! line box, so the gap to the right and bottom edges is the same.

pub mod compositor;
pub mod error;
pub mod position;
pub mod text_renderer;

use image::{RgbImage, RgbaImage};

use crate::constants::{
    DEFAULT_WATERMARK_ALPHA, DEFAULT_WATERMARK_FONT_SIZE, DEFAULT_WATERMARK_MARGIN,
    DEFAULT_WATERMARK_TEXT,
};

pub use compositor::composite_over;
pub use error::WatermarkError;
pub use position::{bottom_right, is_visible, ImageDimensions, PlacementPosition, WatermarkDimensions};
pub use text_renderer::{draw_text, measure_ink, Color, InkBounds, TextRenderOptions};

/// The label applied to every variant
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    /// Alpha of the fill (0-255)
    pub alpha: u8,
    /// Distance from the right and bottom edges in pixels
    pub margin: u32,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            font_size: DEFAULT_WATERMARK_FONT_SIZE,
            color: Color::white(),
            alpha: DEFAULT_WATERMARK_ALPHA,
            margin: DEFAULT_WATERMARK_MARGIN,
        }
    }
}

impl WatermarkSpec {
    fn render_options(&self) -> TextRenderOptions {
        TextRenderOptions {
            text: self.text.clone(),
            font_size: self.font_size,
            color: self.color,
            alpha: self.alpha,
        }
    }
}

/// Stamp `spec` onto `image` in place.
///
/// Returns the top-left corner of the label's ink box. The position may
/// lie partly or fully outside small images; the visible part is still
/// drawn.
pub fn apply_watermark(
    image: &mut RgbImage,
    spec: &WatermarkSpec,
) -> Result<PlacementPosition, WatermarkError> {
    let image_dims = ImageDimensions {
        width: image.width(),
        height: image.height(),
    };

    let ink = match measure_ink(&spec.text, spec.font_size)? {
        Some(ink) => ink,
        None => {
            let empty = WatermarkDimensions {
                width: 0,
                height: 0,
            };
            return Ok(bottom_right(&image_dims, &empty, spec.margin));
        }
    };

    let ink_dims = WatermarkDimensions {
        width: ink.width(),
        height: ink.height(),
    };
    let ink_origin = bottom_right(&image_dims, &ink_dims, spec.margin);

    if !is_visible(&ink_origin, &image_dims, &ink_dims) {
        return Ok(ink_origin);
    }

    // Shift the line box so the ink box lands on `ink_origin`
    let line_origin = PlacementPosition::new(ink_origin.x - ink.min_x, ink_origin.y - ink.min_y);

    let mut overlay = RgbaImage::new(image.width(), image.height());
    draw_text(&mut overlay, line_origin, &spec.render_options())?;
    composite_over(image, &overlay)?;

    Ok(ink_origin)
}
