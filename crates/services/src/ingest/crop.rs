//! Pure crop geometry: no pixels are touched here.

use domains::{AspectRatio, CropRect, Dimensions};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 3.0;

/// A crop window over a source image, locked to an aspect ratio.
///
/// At zoom 1 the window is the largest rectangle of that ratio that fits in
/// the image. Zooming in shrinks it around `centre`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSelection {
    pub image: Dimensions,
    pub aspect: AspectRatio,
    zoom: f64,
    centre: Option<(f64, f64)>,
}

impl CropSelection {
    pub fn new(image: Dimensions, aspect: AspectRatio) -> Self {
        Self {
            image,
            aspect,
            zoom: MIN_ZOOM,
            centre: None,
        }
    }

    /// Clamped to `1.0..=3.0`.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            MIN_ZOOM
        };
        self
    }

    /// Centre of the window in source pixels. Defaults to the image centre.
    pub fn centred_at(mut self, x: f64, y: f64) -> Self {
        self.centre = Some((x, y));
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// The pixel rectangle this selection covers. Always non-empty and
    /// inside the image for a non-empty image.
    pub fn to_rect(&self) -> CropRect {
        let (img_w, img_h) = (f64::from(self.image.width), f64::from(self.image.height));
        let ratio = self.aspect.as_f64();

        // 1. Largest window of the ratio that fits
        let (base_w, base_h) = if img_w / img_h.max(1.0) > ratio {
            (img_h * ratio, img_h)
        } else {
            (img_w, img_w / ratio)
        };

        // 2. Zoom
        let width = (base_w / self.zoom).round().clamp(1.0, img_w.max(1.0));
        let height = (base_h / self.zoom).round().clamp(1.0, img_h.max(1.0));

        // 3. Position around the centre, kept inside the image
        let (cx, cy) = self.centre.unwrap_or((img_w / 2.0, img_h / 2.0));
        let x = (cx - width / 2.0).round().clamp(0.0, (img_w - width).max(0.0));
        let y = (cy - height / 2.0).round().clamp(0.0, (img_h - height).max(0.0));

        CropRect::new(x as u32, y as u32, width as u32, height as u32)
    }
}
