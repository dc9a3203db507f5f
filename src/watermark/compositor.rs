//! Watermark compositor for flattening an overlay onto an opaque image.
//!
//! The overlay is an RGBA image of the same size as the target. Each
//! overlay pixel is blended with the Porter-Duff "over" operator onto the
//! opaque RGB target, so the result is opaque and needs no background.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use super::WatermarkError;

/// Composite `overlay` over `target` in place.
///
/// Both images must have the same dimensions.
pub fn composite_over(target: &mut RgbImage, overlay: &RgbaImage) -> Result<(), WatermarkError> {
    if target.dimensions() != overlay.dimensions() {
        return Err(WatermarkError::OverlaySizeMismatch {
            overlay: overlay.dimensions(),
            image: target.dimensions(),
        });
    }

    for (bg, fg) in target.pixels_mut().zip(overlay.pixels()) {
        if fg[3] > 0 {
            *bg = blend_over_opaque(*bg, *fg);
        }
    }

    Ok(())
}

/// Blend a foreground pixel over an opaque background pixel.
///
/// With an opaque background the "over" operator reduces to
/// `fg * a + bg * (1 - a)` and the output alpha is always 1.
fn blend_over_opaque(background: Rgb<u8>, foreground: Rgba<u8>) -> Rgb<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let result = fg as f32 * fg_alpha + bg as f32 * (1.0 - fg_alpha);
        result.round().clamp(0.0, 255.0) as u8
    };

    Rgb([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
    ])
}
