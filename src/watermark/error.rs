//! Watermark error types.

use std::fmt;

/// Errors raised while stamping the label onto a variant.
#[derive(Debug, Clone)]
pub enum WatermarkError {
    /// The embedded font bytes could not be parsed
    FontUnavailable,

    /// Font size is zero, negative or not finite
    InvalidFontSize(f32),

    /// Overlay and variant differ in size
    OverlaySizeMismatch {
        overlay: (u32, u32),
        image: (u32, u32),
    },
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontUnavailable => write!(f, "Embedded watermark font could not be parsed"),
            Self::InvalidFontSize(size) => {
                write!(f, "Watermark font size must be positive, got {}", size)
            }
            Self::OverlaySizeMismatch { overlay, image } => write!(
                f,
                "Watermark overlay is {}x{} but the variant is {}x{}",
                overlay.0, overlay.1, image.0, image.1
            ),
        }
    }
}

impl std::error::Error for WatermarkError {}
