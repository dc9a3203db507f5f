//! Image processing implementation
//!
//! Handles decoding into the canonical RGB working image and the
//! aspect-preserving downscale applied to each variant.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::RgbImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::error::ImageError;
use super::security::{validate_dimensions, ImageLimits};

fn open_reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, ImageError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::unreadable(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ImageError::unreadable("unrecognized image format"));
    }

    Ok(reader)
}

/// Decode image data into a 3-channel RGB image
///
/// Alpha and palette information is discarded. Dimensions are checked
/// against `limits` from the header before the pixels are decoded.
pub fn decode_image(data: &[u8], limits: &ImageLimits) -> Result<RgbImage, ImageError> {
    if data.is_empty() {
        return Err(ImageError::EmptySource);
    }

    let (width, height) = open_reader(data)?
        .into_dimensions()
        .map_err(|e| ImageError::unreadable(e.to_string()))?;
    validate_dimensions(width, height, limits)?;

    let img = open_reader(data)?
        .decode()
        .map_err(|e| ImageError::unreadable(e.to_string()))?;

    Ok(img.to_rgb8())
}

/// Largest size that fits `(max_width, max_height)` while keeping the aspect ratio
///
/// Images already inside the box are returned unchanged. The scaled side
/// is rounded down or up, whichever keeps the aspect ratio closer to the
/// source, and is never smaller than 1.
pub fn fit_within(src_width: u32, src_height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if src_width <= max_width && src_height <= max_height {
        return (src_width, src_height);
    }

    let aspect = src_width as f64 / src_height as f64;
    let box_w = max_width as f64;
    let box_h = max_height as f64;

    if box_w / box_h >= aspect {
        let width = round_aspect(box_h * aspect, |n| (aspect - n / box_h).abs());
        (width, max_height)
    } else {
        let height = round_aspect(box_w / aspect, |n| {
            if n == 0.0 {
                0.0
            } else {
                (aspect - box_w / n).abs()
            }
        });
        (max_width, height)
    }
}

fn round_aspect(value: f64, distance: impl Fn(f64) -> f64) -> u32 {
    let floor = value.floor();
    let ceil = value.ceil();
    let best = if distance(ceil) < distance(floor) {
        ceil
    } else {
        floor
    };
    (best as u32).max(1)
}

/// Resize image using fast-image-resize with Lanczos3 filter
pub fn resize_image(img: &RgbImage, target_w: u32, target_h: u32) -> Result<RgbImage, ImageError> {
    let src_w = img.width();
    let src_h = img.height();

    if (src_w, src_h) == (target_w, target_h) {
        return Ok(img.clone());
    }

    let resample_err = |reason: String| ImageError::resample(target_w, target_h, reason);

    let (src_width, src_height) = match (NonZeroU32::new(src_w), NonZeroU32::new(src_h)) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(resample_err(format!("source is {}x{}", src_w, src_h))),
    };
    let (dst_width, dst_height) = match (NonZeroU32::new(target_w), NonZeroU32::new(target_h)) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(resample_err("target has a zero side".to_string())),
    };

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| resample_err(format!("source buffer rejected: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x3);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| resample_err(format!("{:?}", e)))?;

    RgbImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| resample_err("output buffer has the wrong length".to_string()))
}
