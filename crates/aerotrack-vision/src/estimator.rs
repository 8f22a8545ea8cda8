//! Angle estimation from the tracked marker pair.
//!
//! Each marker's direction from the fixed origin is measured with `atan2`,
//! folded into +/-90 degrees so a 180 degree flip reads the same, and
//! converted to radians. The two per-marker angles are averaged, then passed
//! through a second first-order smoother with fixed coefficients:
//! `smoothed = 0.9 * previous + 0.1 * average`, starting from `previous = 0`.

use aerotrack_core::Point;
use serde::{Deserialize, Serialize};

use crate::tracker::{PairSnapshot, TrackUpdate};

/// Weight of the new sample in the angle smoother.
pub const ANGLE_SMOOTHING: f64 = 0.1;

/// Fold an angle in degrees back into +/-90 by a half turn.
///
/// Comparisons are strict: exactly `90` and exactly `-90` are left alone, so
/// inputs from `(-180, 180]` other than `-90` land in `(-90, 90]`.
#[inline]
pub fn fold_degrees(deg: f64) -> f64 {
    if deg > 90.0 {
        deg - 180.0
    } else if deg < -90.0 {
        deg + 180.0
    } else {
        deg
    }
}

/// Folded direction of `target` seen from `origin`, in radians.
pub fn folded_angle_rad(origin: Point, target: Point) -> f64 {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    fold_degrees(dy.atan2(dx).to_degrees()).to_radians()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleParams {
    /// Truncate pivot and marker coordinates to whole pixels before `atan2`.
    pub snap_to_pixel: bool,
}

impl Default for AngleParams {
    fn default() -> Self {
        Self {
            snap_to_pixel: true,
        }
    }
}

/// Per-frame estimator outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AngleUpdate {
    /// Fresh smoothed angle in radians.
    Updated(f64),
    /// No valid pair this frame; carries the unchanged previous angle.
    Held(f64),
}

impl AngleUpdate {
    pub fn value(&self) -> f64 {
        match *self {
            AngleUpdate::Updated(v) | AngleUpdate::Held(v) => v,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, AngleUpdate::Updated(_))
    }
}

#[derive(Clone, Debug, Default)]
pub struct AngleEstimator {
    params: AngleParams,
    smoothed: f64,
    last_raw: Option<f64>,
}

impl AngleEstimator {
    pub fn new(params: AngleParams) -> Self {
        Self {
            params,
            smoothed: 0.0,
            last_raw: None,
        }
    }

    /// Current smoothed angle in radians.
    pub fn angle(&self) -> f64 {
        self.smoothed
    }

    /// Unsmoothed average of the last valid frame.
    pub fn last_raw(&self) -> Option<f64> {
        self.last_raw
    }

    fn snap(&self, p: Point) -> Point {
        if self.params.snap_to_pixel {
            Point::new(p.x.trunc(), p.y.trunc())
        } else {
            p
        }
    }

    /// Mean of the folded Left and Right angles around the fixed origin.
    pub fn raw_average(&self, snapshot: &PairSnapshot) -> f64 {
        let origin = self.snap(snapshot.fixed_origin);
        let left = folded_angle_rad(origin, self.snap(snapshot.markers.left));
        let right = folded_angle_rad(origin, self.snap(snapshot.markers.right));
        (left + right) / 2.0
    }

    pub fn update(&mut self, track: &TrackUpdate) -> AngleUpdate {
        match track {
            TrackUpdate::Updated(snapshot) => {
                let raw = self.raw_average(snapshot);
                self.smoothed = (1.0 - ANGLE_SMOOTHING) * self.smoothed + ANGLE_SMOOTHING * raw;
                self.last_raw = Some(raw);
                AngleUpdate::Updated(self.smoothed)
            }
            TrackUpdate::Held => AngleUpdate::Held(self.smoothed),
        }
    }
}
