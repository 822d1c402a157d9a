//! # Image processor
//!
//! `MediaProcessor` on the pure Rust `image` crate, with `oxipng` for
//! lossless PNG shrinking.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF, BMP) | `image::ImageReader` with guessed format |
//! | Crop | `DynamicImage::crop_imm`, 1:1, never resampled |
//! | Encode photo | `JpegEncoder::new_with_quality` |
//! | Encode with transparency | `PngEncoder` |
//! | Compress JPEG | re-encode down the quality ladder |
//! | Compress PNG | `oxipng::optimize_from_memory` |

use bytes::Bytes;
use domains::{CropRect, Dimensions, DomainError, EncodedFormat, EncodedImage, MediaLimits, MediaProcessor};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use tracing::debug;

/// oxipng preset used for PNG outputs (0 fastest, 6 smallest).
const PNG_PRESET: u8 = 2;

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageMediaProcessor;

impl ImageMediaProcessor {
    pub fn new() -> Self {
        Self
    }
}

fn media_err(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Media(format!("{context}: {err}"))
}

fn decode(source: &[u8]) -> Result<DynamicImage, DomainError> {
    ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| media_err("unreadable image", e))?
        .decode()
        .map_err(|e| media_err("failed to decode image", e))
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::new();
    img.to_rgb8()
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)))
        .map_err(|e| media_err("jpeg encode failed", e))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::new();
    img.to_rgba8()
        .write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| media_err("png encode failed", e))?;
    Ok(buf)
}

impl MediaProcessor for ImageMediaProcessor {
    fn dimensions(&self, source: &[u8]) -> Result<Dimensions, DomainError> {
        let (width, height) = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| media_err("unreadable image", e))?
            .into_dimensions()
            .map_err(|e| media_err("not a supported image", e))?;
        Ok(Dimensions { width, height })
    }

    fn rasterize(&self, source: &[u8], crop: CropRect, quality: u8) -> Result<EncodedImage, DomainError> {
        let img = decode(source)?;
        let dims = Dimensions {
            width: img.width(),
            height: img.height(),
        };
        if !crop.fits_within(dims) {
            return Err(DomainError::Validation(format!(
                "crop {}x{}+{}+{} is outside the {}x{} image",
                crop.width, crop.height, crop.x, crop.y, dims.width, dims.height
            )));
        }

        let cropped = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
        let (format, data) = if cropped.color().has_alpha() {
            (EncodedFormat::Png, encode_png(&cropped)?)
        } else {
            (EncodedFormat::Jpeg, encode_jpeg(&cropped, quality)?)
        };
        debug!(width = crop.width, height = crop.height, size = data.len(), ?format, "rasterized");

        Ok(EncodedImage {
            data: Bytes::from(data),
            format,
            width: cropped.width(),
            height: cropped.height(),
        })
    }

    /// Returns the first encoding within `limits.max_bytes`, or the smallest
    /// one found if none fits. Pixel size never changes.
    fn compress(&self, image: EncodedImage, limits: &MediaLimits) -> Result<EncodedImage, DomainError> {
        if image.len() <= limits.max_bytes {
            return Ok(image);
        }

        match image.format {
            EncodedFormat::Png => {
                let options = oxipng::Options::from_preset(PNG_PRESET);
                let optimized = oxipng::optimize_from_memory(&image.data, &options)
                    .map_err(|e| media_err("png optimisation failed", e))?;
                debug!(before = image.len(), after = optimized.len(), "png optimised");
                if optimized.len() < image.len() {
                    return Ok(EncodedImage {
                        data: Bytes::from(optimized),
                        ..image
                    });
                }
                Ok(image)
            }
            EncodedFormat::Jpeg => {
                let decoded = decode(&image.data)?;
                let mut best = image;
                for quality in limits.quality_ladder() {
                    let data = encode_jpeg(&decoded, quality)?;
                    debug!(quality, size = data.len(), "jpeg re-encoded");
                    if data.len() < best.len() {
                        best = EncodedImage {
                            data: Bytes::from(data),
                            ..best
                        };
                    }
                    if best.len() <= limits.max_bytes {
                        break;
                    }
                }
                Ok(best)
            }
        }
    }
}
