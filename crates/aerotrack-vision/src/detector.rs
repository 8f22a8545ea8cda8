use aerotrack_core::{Point, RgbImageView};
use serde::{Deserialize, Serialize};

use crate::error::VisionError;
use crate::segment::{Blob, BoundingBox, HsvBandSegmenter, Segmenter};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// The pair tracker consumes exactly two regions; anything beyond the two
/// largest is discarded.
pub const MAX_REGIONS: usize = 2;

/// Filtering policy for segmented regions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerDetectorParams {
    /// Minimum region area as a fraction of the frame area.
    pub min_area_ratio: f64,
}

impl Default for MarkerDetectorParams {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.0005,
        }
    }
}

impl MarkerDetectorParams {
    pub fn validate(&self) -> Result<(), VisionError> {
        if !self.min_area_ratio.is_finite() || !(0.0..=1.0).contains(&self.min_area_ratio) {
            return Err(VisionError::InvalidAreaRatio(self.min_area_ratio));
        }
        Ok(())
    }

    /// Absolute area threshold in pixels for a `width x height` frame.
    pub fn min_area_px(&self, width: usize, height: usize) -> f64 {
        let raw = (self.min_area_ratio * width as f64 * height as f64).floor();
        raw.max(1.0)
    }
}

/// One qualifying marker region for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRegion {
    pub area: f64,
    pub centroid: Point,
    pub bbox: BoundingBox,
}

impl From<Blob> for CandidateRegion {
    fn from(blob: Blob) -> Self {
        Self {
            area: blob.area,
            centroid: blob.bbox.centroid(),
            bbox: blob.bbox,
        }
    }
}

/// Keep regions whose area meets the frame-relative threshold, largest first,
/// truncated to [`MAX_REGIONS`]. Equal areas keep their segmentation order.
pub fn filter_and_rank(
    blobs: Vec<Blob>,
    width: usize,
    height: usize,
    params: &MarkerDetectorParams,
) -> Vec<CandidateRegion> {
    let min_area = params.min_area_px(width, height);
    let mut kept: Vec<CandidateRegion> = blobs
        .into_iter()
        .filter(|b| b.area >= min_area)
        .map(CandidateRegion::from)
        .collect();
    kept.sort_by(|a, b| {
        b.area
            .partial_cmp(&a.area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    kept.truncate(MAX_REGIONS);
    kept
}

/// Marker detector: segmentation followed by the area filter.
pub struct MarkerDetector<S = HsvBandSegmenter> {
    segmenter: S,
    params: MarkerDetectorParams,
}

impl<S: Segmenter> MarkerDetector<S> {
    pub fn new(segmenter: S, params: MarkerDetectorParams) -> Result<Self, VisionError> {
        params.validate()?;
        Ok(Self { segmenter, params })
    }

    pub fn params(&self) -> &MarkerDetectorParams {
        &self.params
    }

    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn detect(&self, frame: &RgbImageView<'_>) -> Vec<CandidateRegion> {
        let blobs = self.segmenter.segment(frame);
        let found = blobs.len();
        let kept = filter_and_rank(blobs, frame.width(), frame.height(), &self.params);
        log::trace!("segmented {} regions, {} qualify", found, kept.len());
        kept
    }
}
