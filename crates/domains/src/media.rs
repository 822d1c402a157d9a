//! # Media Types
//!
//! Data carried between the ingestion pipeline and the media processor port.
//! These describe *what* to produce; pixels are only touched by the
//! processor implementation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Pixel size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A confirmed crop, in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// True when the rectangle is non-empty and lies inside `dims`.
    pub fn fits_within(&self, dims: Dimensions) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(dims.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(dims.height)
    }
}

/// Output encodings produced by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodedFormat {
    /// Lossy, quality-tunable; used for photos
    Jpeg,
    /// Lossless; used when the source carries transparency
    Png,
}

impl EncodedFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            EncodedFormat::Jpeg => "image/jpeg",
            EncodedFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            EncodedFormat::Jpeg => "jpg",
            EncodedFormat::Png => "png",
        }
    }
}

/// An encoded image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: Bytes,
    pub format: EncodedFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Size and quality bounds for rasterization and compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLimits {
    /// Upper bound on the uploaded file size (0.2 MB)
    pub max_bytes: usize,
    /// Quality of the first encode after cropping
    pub initial_quality: u8,
    /// Lowest quality the compressor may reach
    pub min_quality: u8,
    /// Quality decrement per compression pass
    pub quality_step: u8,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            max_bytes: 209_715,
            initial_quality: 85,
            min_quality: 30,
            quality_step: 10,
        }
    }
}

impl MediaLimits {
    /// Qualities tried by the compressor after the initial encode, highest first.
    pub fn quality_ladder(&self) -> Vec<u8> {
        let step = self.quality_step.max(1);
        let floor = self.min_quality.clamp(1, 100);
        let mut ladder = Vec::new();
        let mut q = self.initial_quality.clamp(1, 100);
        while q > floor {
            q = q.saturating_sub(step).max(floor);
            ladder.push(q);
        }
        ladder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_bounds() {
        let dims = Dimensions {
            width: 100,
            height: 50,
        };
        assert!(CropRect::new(0, 0, 100, 50).fits_within(dims));
        assert!(CropRect::new(10, 10, 90, 40).fits_within(dims));
        assert!(!CropRect::new(11, 0, 90, 50).fits_within(dims));
        assert!(!CropRect::new(0, 0, 0, 10).fits_within(dims));
        assert!(!CropRect::new(u32::MAX, 0, 2, 2).fits_within(dims));
    }

    #[test]
    fn ladder_descends_to_floor() {
        let limits = MediaLimits::default();
        assert_eq!(limits.quality_ladder(), vec![75, 65, 55, 45, 35, 30]);

        let flat = MediaLimits {
            initial_quality: 30,
            ..MediaLimits::default()
        };
        assert!(flat.quality_ladder().is_empty());
    }
}
