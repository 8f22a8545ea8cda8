//! Two-marker angle measurement.
//!
//! ## Quickstart
//!
//! ```
//! use aerotrack_core::{angle_register, Point};
//! use aerotrack_vision::{render_marker_pair, AnglePipeline, PipelineParams};
//!
//! let (writer, reader) = angle_register(0.0);
//! let mut pipeline = AnglePipeline::new(PipelineParams::default(), writer).unwrap();
//!
//! let frame = render_marker_pair(320, 240, Point::new(80.0, 120.0), Point::new(240.0, 120.0), 8)
//!     .unwrap();
//! let outcome = pipeline.process_frame(&frame.view());
//! assert!(outcome.angle.is_fresh());
//! println!("angle: {} rad", reader.latest());
//! ```
//!
//! Per frame:
//! 1. Segment marker-coloured regions ([`Segmenter`], default [`HsvBandSegmenter`]).
//! 2. Keep the two largest regions above a frame-relative area threshold.
//! 3. With exactly two regions, assign Left/Right, smooth both, smooth their
//!    midpoint, and capture the fixed origin on the first pair.
//! 4. Average the folded per-marker angles around the fixed origin and smooth.
//! 5. Publish the smoothed angle to the shared register.
//!
//! Frames with any other region count hold every piece of state.

mod detector;
mod error;
mod estimator;
mod identity;
mod pipeline;
pub mod segment;
mod source;
mod tracker;

pub use detector::{
    filter_and_rank, CandidateRegion, MarkerDetector, MarkerDetectorParams, MAX_REGIONS,
};
pub use error::VisionError;
pub use estimator::{
    fold_degrees, folded_angle_rad, AngleEstimator, AngleParams, AngleUpdate, ANGLE_SMOOTHING,
};
pub use identity::{IdentityPolicy, IdentityStrategy, MarkerPair, NearestNeighbor, SortByX};
pub use pipeline::{AnglePipeline, FrameOutcome, PipelineParams, PipelineStats};
pub use segment::{Blob, BoundingBox, HsvBandParams, HsvBandSegmenter, Segmenter};
pub use source::{
    render_marker_pair, FrameSource, SourceError, SyntheticPairSource, BACKGROUND_BLUE,
    MARKER_YELLOW,
};
pub use tracker::{MarkerPairTracker, PairSnapshot, TrackUpdate, TrackerParams, TrackerState};
