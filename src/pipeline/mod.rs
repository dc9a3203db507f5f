// Variant pipeline - decode once, then render and upload every variant
//
// Rendering is pure CPU work on owned buffers; uploading goes through the
// ObjectStore trait. Variants are uploaded in order and the first failure
// aborts the rest. Variants uploaded before the failure are kept.

use bytes::Bytes;
use image::RgbImage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::error::ProcessingError;
use crate::image_optimizer::{
    decode_image, fit_within, resize_image, EncodedImage, EncoderQuality, ImageEncoder,
    ImageLimits, JpegEncoder, VariantSpec, VARIANTS,
};
use crate::storage::ObjectStore;
use crate::watermark::{apply_watermark, WatermarkSpec};

/// A variant rendered in memory, ready to upload
#[derive(Debug)]
pub struct RenderedVariant {
    pub variant: VariantSpec,
    pub encoded: EncodedImage,
}

/// A variant written to the destination bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedVariant {
    pub variant: &'static str,
    pub bucket: String,
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

/// Decode, resize, watermark and encode; no I/O
#[derive(Clone)]
pub struct VariantRenderer {
    limits: ImageLimits,
    watermark: WatermarkSpec,
    quality: EncoderQuality,
    encoder: Arc<dyn ImageEncoder>,
}

impl std::fmt::Debug for VariantRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantRenderer")
            .field("limits", &self.limits)
            .field("watermark", &self.watermark)
            .field("quality", &self.quality)
            .field("encoder", &self.encoder.format_name())
            .finish()
    }
}

impl Default for VariantRenderer {
    fn default() -> Self {
        Self::new(ImageLimits::default())
    }
}

impl VariantRenderer {
    pub fn new(limits: ImageLimits) -> Self {
        Self {
            limits,
            watermark: WatermarkSpec::default(),
            quality: EncoderQuality::default(),
            encoder: Arc::new(JpegEncoder),
        }
    }

    pub fn with_watermark(mut self, watermark: WatermarkSpec) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn ImageEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Decode source bytes into the canonical RGB working image
    pub fn decode(&self, image_bytes: &[u8]) -> Result<RgbImage, ProcessingError> {
        decode_image(image_bytes, &self.limits).map_err(ProcessingError::Decode)
    }

    /// Render one variant from the canonical image
    ///
    /// The canonical image is only read; the variant works on its own buffer.
    pub fn render(
        &self,
        canonical: &RgbImage,
        variant: &VariantSpec,
    ) -> Result<RenderedVariant, ProcessingError> {
        let (width, height) = fit_within(
            canonical.width(),
            canonical.height(),
            variant.max_width,
            variant.max_height,
        );

        let mut working =
            resize_image(canonical, width, height).map_err(|source| ProcessingError::Resize {
                variant: variant.name.to_string(),
                source,
            })?;

        apply_watermark(&mut working, &self.watermark).map_err(|source| {
            ProcessingError::Watermark {
                variant: variant.name.to_string(),
                source,
            }
        })?;

        let encoded = self
            .encoder
            .encode(&working, self.quality)
            .map_err(|source| ProcessingError::Encode {
                variant: variant.name.to_string(),
                source,
            })?;

        Ok(RenderedVariant {
            variant: *variant,
            encoded,
        })
    }

    /// Render every variant without uploading
    pub fn render_all(&self, image_bytes: &[u8]) -> Result<Vec<RenderedVariant>, ProcessingError> {
        let canonical = self.decode(image_bytes)?;
        VARIANTS
            .iter()
            .map(|variant| self.render(&canonical, variant))
            .collect()
    }
}

/// Renders variants of a source image and writes them to a bucket
#[derive(Clone)]
pub struct VariantPipeline {
    store: Arc<dyn ObjectStore>,
    renderer: VariantRenderer,
}

impl VariantPipeline {
    pub fn new(store: Arc<dyn ObjectStore>, renderer: VariantRenderer) -> Self {
        Self { store, renderer }
    }

    /// Produce and upload every variant of `image_bytes`
    ///
    /// Nothing is uploaded unless the source decodes. Each variant is
    /// rendered then uploaded before the next one starts.
    pub async fn process(
        &self,
        image_bytes: &[u8],
        dest_bucket: &str,
        source_key: &str,
    ) -> Result<Vec<UploadedVariant>, ProcessingError> {
        let canonical = self.renderer.decode(image_bytes)?;
        tracing::debug!(
            key = %source_key,
            width = canonical.width(),
            height = canonical.height(),
            "Decoded source image"
        );

        let mut uploaded = Vec::with_capacity(VARIANTS.len());

        for variant in VARIANTS.iter() {
            let start = Instant::now();
            let rendered = self.renderer.render(&canonical, variant)?;
            let key = variant.output_key(source_key);
            let (width, height) = rendered.encoded.dimensions;
            let size_bytes = rendered.encoded.data.len();

            self.store
                .put_object(
                    dest_bucket,
                    &key,
                    Bytes::from(rendered.encoded.data),
                    rendered.encoded.content_type,
                )
                .await
                .map_err(|source| ProcessingError::Upload {
                    bucket: dest_bucket.to_string(),
                    key: key.clone(),
                    source,
                })?;

            tracing::info!(
                bucket = %dest_bucket,
                key = %key,
                variant = variant.name,
                width,
                height,
                size_bytes,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Saved {}/{}",
                dest_bucket,
                key
            );

            uploaded.push(UploadedVariant {
                variant: variant.name,
                bucket: dest_bucket.to_string(),
                key,
                width,
                height,
                size_bytes,
            });
        }

        Ok(uploaded)
    }
}
