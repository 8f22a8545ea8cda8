//! Marker pair tracker.
//!
//! Two states: `Uninitialized` until the first frame with exactly two
//! qualifying regions, then `Tracking`. On every frame with exactly two
//! regions the identity strategy assigns Left/Right, both markers are
//! EMA-smoothed, and the midpoint of the *smoothed* markers feeds a third EMA
//! (the reference origin). The fixed origin is captured from that smoothed
//! midpoint once, on the transition, and never changes afterwards.
//!
//! Any other region count leaves every field untouched.

use aerotrack_core::{Ema, Point};
use serde::{Deserialize, Serialize};

use crate::detector::CandidateRegion;
use crate::error::VisionError;
use crate::identity::{IdentityPolicy, IdentityStrategy, MarkerPair};

/// Tracker configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// EMA coefficient for marker and reference smoothing.
    pub alpha: f64,
    pub identity: IdentityPolicy,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            identity: IdentityPolicy::SortByX,
        }
    }
}

impl TrackerParams {
    pub fn validate(&self) -> Result<(), VisionError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(VisionError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerState {
    Uninitialized,
    Tracking,
}

/// Tracker state after a successful update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairSnapshot {
    /// Smoothed Left/Right centroids.
    pub markers: MarkerPair,
    /// Smoothed reference midpoint.
    pub reference: Point,
    /// Pivot captured on the first valid pair.
    pub fixed_origin: Point,
}

/// Per-frame tracker outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackUpdate {
    Updated(PairSnapshot),
    /// Not exactly two regions this frame; state unchanged.
    Held,
}

impl TrackUpdate {
    pub fn is_updated(&self) -> bool {
        matches!(self, TrackUpdate::Updated(_))
    }
}

pub struct MarkerPairTracker {
    left: Ema<Point>,
    right: Ema<Point>,
    reference: Ema<Point>,
    fixed_origin: Option<Point>,
    strategy: Box<dyn IdentityStrategy>,
}

impl MarkerPairTracker {
    pub fn new(params: TrackerParams) -> Result<Self, VisionError> {
        params.validate()?;
        Ok(Self::with_strategy(params.alpha, params.identity.strategy()))
    }

    /// Build with a custom identity strategy. `alpha` is not validated.
    pub fn with_strategy(alpha: f64, strategy: Box<dyn IdentityStrategy>) -> Self {
        Self {
            left: Ema::new(alpha),
            right: Ema::new(alpha),
            reference: Ema::new(alpha),
            fixed_origin: None,
            strategy,
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.fixed_origin.is_some() {
            TrackerState::Tracking
        } else {
            TrackerState::Uninitialized
        }
    }

    pub fn fixed_origin(&self) -> Option<Point> {
        self.fixed_origin
    }

    pub fn left(&self) -> Option<Point> {
        self.left.value()
    }

    pub fn right(&self) -> Option<Point> {
        self.right.value()
    }

    pub fn reference(&self) -> Option<Point> {
        self.reference.value()
    }

    fn smoothed_pair(&self) -> Option<MarkerPair> {
        Some(MarkerPair {
            left: self.left.value()?,
            right: self.right.value()?,
        })
    }

    /// Feed this frame's candidate regions.
    pub fn update(&mut self, candidates: &[CandidateRegion]) -> TrackUpdate {
        let [a, b] = candidates else {
            return TrackUpdate::Held;
        };

        let previous = self.smoothed_pair();
        let assigned = self
            .strategy
            .assign_identity(previous.as_ref(), [a.centroid, b.centroid]);

        let markers = MarkerPair {
            left: self.left.update(assigned.left),
            right: self.right.update(assigned.right),
        };
        let reference = self.reference.update(markers.midpoint());
        let fixed_origin = *self.fixed_origin.get_or_insert_with(|| {
            log::info!(
                "marker pair acquired, fixed origin at ({:.1}, {:.1})",
                reference.x,
                reference.y
            );
            reference
        });

        TrackUpdate::Updated(PairSnapshot {
            markers,
            reference,
            fixed_origin,
        })
    }

    /// Forget all smoothed state and return to `Uninitialized`.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.reference.reset();
        self.fixed_origin = None;
    }
}
