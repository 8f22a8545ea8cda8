use aerotrack_core::{AngleWriter, RgbImageView};
use serde::{Deserialize, Serialize};

use crate::detector::{CandidateRegion, MarkerDetector, MarkerDetectorParams};
use crate::error::VisionError;
use crate::estimator::{AngleEstimator, AngleParams, AngleUpdate};
use crate::segment::{HsvBandParams, HsvBandSegmenter, Segmenter};
use crate::tracker::{MarkerPairTracker, TrackUpdate, TrackerParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// All vision-side parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub segmentation: HsvBandParams,
    pub detector: MarkerDetectorParams,
    pub tracker: TrackerParams,
    pub angle: AngleParams,
}

/// What happened to one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutcome {
    pub regions: Vec<CandidateRegion>,
    pub track: TrackUpdate,
    pub angle: AngleUpdate,
}

/// Frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub frames: u64,
    /// Frames that produced a fresh angle.
    pub fresh: u64,
}

/// Detector, tracker and estimator wired to the angle register.
///
/// The pipeline owns the only [`AngleWriter`]; it publishes after every frame
/// that produced a fresh angle and leaves the register alone otherwise.
pub struct AnglePipeline<S = HsvBandSegmenter> {
    detector: MarkerDetector<S>,
    tracker: MarkerPairTracker,
    estimator: AngleEstimator,
    writer: AngleWriter,
    stats: PipelineStats,
}

impl AnglePipeline<HsvBandSegmenter> {
    pub fn new(params: PipelineParams, writer: AngleWriter) -> Result<Self, VisionError> {
        let segmenter = HsvBandSegmenter::new(params.segmentation);
        Self::with_segmenter(segmenter, params, writer)
    }
}

impl<S: Segmenter> AnglePipeline<S> {
    pub fn with_segmenter(
        segmenter: S,
        params: PipelineParams,
        writer: AngleWriter,
    ) -> Result<Self, VisionError> {
        Ok(Self {
            detector: MarkerDetector::new(segmenter, params.detector)?,
            tracker: MarkerPairTracker::new(params.tracker)?,
            estimator: AngleEstimator::new(params.angle),
            writer,
            stats: PipelineStats::default(),
        })
    }

    /// Swap in a tracker built elsewhere, e.g. with a custom identity strategy.
    pub fn with_tracker(mut self, tracker: MarkerPairTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &MarkerPairTracker {
        &self.tracker
    }

    pub fn estimator(&self) -> &AngleEstimator {
        &self.estimator
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Current smoothed angle in radians.
    pub fn angle(&self) -> f64 {
        self.estimator.angle()
    }

    /// Detect, track, estimate and publish for one frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn process_frame(&mut self, frame: &RgbImageView<'_>) -> FrameOutcome {
        let regions = self.detector.detect(frame);
        self.process_regions(regions)
    }

    /// Run the post-detection stages on already-detected regions.
    pub fn process_regions(&mut self, regions: Vec<CandidateRegion>) -> FrameOutcome {
        let track = self.tracker.update(&regions);
        let angle = self.estimator.update(&track);

        self.stats.frames += 1;
        if let AngleUpdate::Updated(value) = angle {
            self.stats.fresh += 1;
            self.writer.publish(value);
        }

        log::debug!(
            "frame {}: {} regions, {} angle {:.2} deg",
            self.stats.frames,
            regions.len(),
            if angle.is_fresh() { "fresh" } else { "held" },
            angle.value().to_degrees()
        );

        FrameOutcome {
            regions,
            track,
            angle,
        }
    }
}
