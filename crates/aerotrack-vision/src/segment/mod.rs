//! Colour segmentation.
//!
//! The detector only needs "regions of pixels inside a colour band, with area
//! and bounding box". That capability is the [`Segmenter`] trait; the
//! reference implementation [`HsvBandSegmenter`] does:
//! 1. Binomial blur of the RGB frame.
//! 2. 8-bit HSV conversion and inclusive band test.
//! 3. Morphological close, then open, with a square kernel.
//! 4. 8-connected outer region extraction.

mod blur;
mod components;
mod morphology;

pub use blur::gaussian_blur;
pub use components::connected_regions;
pub use morphology::{close, dilate, erode, open};

use aerotrack_core::{in_band, rgb_to_hsv8, Mask, Point, RgbImageView};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Axis-aligned bounding box in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    /// Box centre with integer halving: `(x + w/2, y + h/2)`.
    pub fn centroid(&self) -> Point {
        Point::new(
            (self.x + self.width / 2) as f64,
            (self.y + self.height / 2) as f64,
        )
    }
}

/// One segmented region, before any area filtering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// Pixel area.
    pub area: f64,
    pub bbox: BoundingBox,
}

/// External capability: find regions matching the marker colour.
pub trait Segmenter {
    fn segment(&self, frame: &RgbImageView<'_>) -> Vec<Blob>;
}

impl<S: Segmenter + ?Sized> Segmenter for Box<S> {
    fn segment(&self, frame: &RgbImageView<'_>) -> Vec<Blob> {
        (**self).segment(frame)
    }
}

/// Parameters for [`HsvBandSegmenter`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HsvBandParams {
    /// Inclusive lower HSV bound (H in 0..=179).
    pub lower: [u8; 3],
    /// Inclusive upper HSV bound.
    pub upper: [u8; 3],
    /// Blur kernel size; 0 or 1 disables blurring.
    pub blur_kernel: usize,
    /// Square morphology kernel size; 0 or 1 disables close/open.
    pub morph_kernel: usize,
}

impl Default for HsvBandParams {
    fn default() -> Self {
        // yellow markers
        Self {
            lower: [20, 100, 100],
            upper: [35, 255, 255],
            blur_kernel: 5,
            morph_kernel: 7,
        }
    }
}

/// Reference segmenter: blur, HSV band, close/open, connected regions.
#[derive(Clone, Debug, Default)]
pub struct HsvBandSegmenter {
    params: HsvBandParams,
}

impl HsvBandSegmenter {
    pub fn new(params: HsvBandParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HsvBandParams {
        &self.params
    }

    /// Binary mask after blur, band test and morphology.
    pub fn mask(&self, frame: &RgbImageView<'_>) -> Mask {
        let blurred = gaussian_blur(frame, self.params.blur_kernel);
        let view = blurred.view();

        let mut mask = Mask::new(frame.width(), frame.height());
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let hsv = rgb_to_hsv8(view.pixel(x, y));
                if in_band(hsv, self.params.lower, self.params.upper) {
                    mask.set(x, y, true);
                }
            }
        }

        let k = self.params.morph_kernel;
        open(&close(&mask, k), k)
    }
}

impl Segmenter for HsvBandSegmenter {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    fn segment(&self, frame: &RgbImageView<'_>) -> Vec<Blob> {
        connected_regions(&self.mask(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerotrack_core::RgbImage;

    const YELLOW: [u8; 3] = [255, 220, 0];
    const BLUE: [u8; 3] = [20, 40, 200];

    #[test]
    fn centroid_uses_integer_halving() {
        let b = BoundingBox {
            x: 10,
            y: 20,
            width: 5,
            height: 4,
        };
        assert_eq!(b.centroid(), Point::new(12.0, 22.0));
    }

    #[test]
    fn finds_two_yellow_squares_on_blue() {
        let mut img = RgbImage::filled(120, 80, BLUE).unwrap();
        img.fill_rect(10, 30, 16, 16, YELLOW);
        img.fill_rect(80, 20, 20, 20, YELLOW);

        let blobs = HsvBandSegmenter::default().segment(&img.view());
        assert_eq!(blobs.len(), 2);
        let big = blobs.iter().find(|b| b.bbox.x >= 70).unwrap();
        let c = big.bbox.centroid();
        assert!((c.x - 90.0).abs() <= 1.0, "{c:?}");
        assert!((c.y - 30.0).abs() <= 1.0, "{c:?}");
    }

    #[test]
    fn speckles_are_removed() {
        let mut img = RgbImage::filled(60, 60, BLUE).unwrap();
        img.fill_rect(5, 5, 2, 2, YELLOW);
        img.fill_rect(40, 40, 1, 1, YELLOW);
        assert!(HsvBandSegmenter::default().segment(&img.view()).is_empty());
    }

    #[test]
    fn other_hues_are_ignored() {
        let mut img = RgbImage::filled(60, 60, BLUE).unwrap();
        img.fill_rect(10, 10, 20, 20, [255, 0, 0]);
        assert!(HsvBandSegmenter::default().segment(&img.view()).is_empty());
    }
}
