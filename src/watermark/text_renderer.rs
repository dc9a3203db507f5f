//! Text watermark rendering.
//!
//! Draws a single line of text into an RGBA overlay using an embedded
//! DejaVu Sans Mono font.
//!
//! Characters the font has no glyph for are dropped: they are neither
//! drawn nor advanced. Measuring and drawing share one layout, so the
//! measured ink box is exactly where pixels land.

use super::position::PlacementPosition;
use super::WatermarkError;
use ab_glyph::{point, Font, FontRef, Glyph, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

static DEFAULT_FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

/// Embedded font data (DejaVu Sans Mono, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Get the default font, initializing it lazily.
fn get_default_font() -> Result<&'static FontRef<'static>, WatermarkError> {
    DEFAULT_FONT
        .get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA).ok())
        .as_ref()
        .ok_or(WatermarkError::FontUnavailable)
}

/// RGB text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White color.
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color (RGB).
    pub color: Color,
    /// Alpha of fully covered pixels (0-255).
    pub alpha: u8,
}

fn check_font_size(font_size: f32) -> Result<PxScale, WatermarkError> {
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(WatermarkError::InvalidFontSize(font_size));
    }
    Ok(PxScale::from(font_size))
}

/// Glyphs of `text` that the font can render, in order.
fn renderable_glyphs<'a, F: Font>(font: &'a F, text: &'a str) -> impl Iterator<Item = GlyphId> + 'a {
    text.chars()
        .map(move |c| font.glyph_id(c))
        .filter(|id| id.0 != 0)
}

/// Position every renderable glyph on one line whose box starts at `origin`.
fn layout(font: &FontRef<'static>, scale: PxScale, text: &str, origin: PlacementPosition) -> Vec<Glyph> {
    let scaled_font = font.as_scaled(scale);
    let baseline_y = origin.y as f32 + scaled_font.ascent();

    let mut cursor_x = origin.x as f32;
    let mut prev_glyph: Option<GlyphId> = None;
    let mut glyphs = Vec::new();

    for glyph_id in renderable_glyphs(font, text) {
        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        glyphs.push(glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y)));

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    glyphs
}

/// Pixel box covered by the outlines of a laid-out label.
///
/// Coordinates are relative to the line box origin passed to `draw_text`.
/// `max_x` and `max_y` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl InkBounds {
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y).max(0) as u32
    }
}

/// Measure the ink of `text` drawn with its line box at (0, 0).
///
/// Returns `None` when no character has a visible outline (empty text,
/// whitespace, or only unknown glyphs).
pub fn measure_ink(text: &str, font_size: f32) -> Result<Option<InkBounds>, WatermarkError> {
    let font = get_default_font()?;
    let scale = check_font_size(font_size)?;

    let bounds = layout(font, scale, text, PlacementPosition::new(0, 0))
        .into_iter()
        .filter_map(|glyph| font.outline_glyph(glyph))
        .map(|outlined| outlined.px_bounds())
        .fold(None, |acc: Option<InkBounds>, rect| {
            let glyph_box = InkBounds {
                min_x: rect.min.x as i32,
                min_y: rect.min.y as i32,
                max_x: rect.max.x as i32,
                max_y: rect.max.y as i32,
            };
            Some(match acc {
                None => glyph_box,
                Some(b) => InkBounds {
                    min_x: b.min_x.min(glyph_box.min_x),
                    min_y: b.min_y.min(glyph_box.min_y),
                    max_x: b.max_x.max(glyph_box.max_x),
                    max_y: b.max_y.max(glyph_box.max_y),
                },
            })
        });

    Ok(bounds)
}

/// Draw text onto `canvas` with its line box at `origin`.
///
/// Pixels falling outside the canvas are clipped. Returns the number of
/// glyphs drawn.
pub fn draw_text(
    canvas: &mut RgbaImage,
    origin: PlacementPosition,
    options: &TextRenderOptions,
) -> Result<usize, WatermarkError> {
    let font = get_default_font()?;
    let scale = check_font_size(options.font_size)?;

    let canvas_width = canvas.width() as i32;
    let canvas_height = canvas.height() as i32;
    let mut drawn = 0;

    for glyph in layout(font, scale, &options.text, origin) {
        // Whitespace has no outline
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();

        outlined.draw(|px, py, coverage| {
            let x = px as i32 + bounds.min.x as i32;
            let y = py as i32 + bounds.min.y as i32;

            if x >= 0 && y >= 0 && x < canvas_width && y < canvas_height {
                let pixel_alpha = (coverage.clamp(0.0, 1.0) * options.alpha as f32).round() as u8;
                let pixel = Rgba([
                    options.color.r,
                    options.color.g,
                    options.color.b,
                    pixel_alpha,
                ]);

                let existing = canvas.get_pixel(x as u32, y as u32);
                let blended = blend_pixels(*existing, pixel);
                canvas.put_pixel(x as u32, y as u32, blended);
            }
        });
        drawn += 1;
    }

    Ok(drawn)
}

/// Blend two RGBA pixels using alpha compositing.
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
