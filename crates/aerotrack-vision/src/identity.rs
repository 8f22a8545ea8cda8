//! Left/right identity assignment for the marker pair.
//!
//! The default policy is [`SortByX`]: the smaller x is Left. It has no
//! temporal memory, so markers that swap sides across the vertical midline
//! swap identity too, and the angle jumps accordingly. [`NearestNeighbor`]
//! keeps slots by minimum displacement instead.

use aerotrack_core::Point;
use nalgebra::distance;
use serde::{Deserialize, Serialize};

/// Left/right marker positions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPair {
    pub left: Point,
    pub right: Point,
}

impl MarkerPair {
    pub fn midpoint(&self) -> Point {
        nalgebra::center(&self.left, &self.right)
    }
}

/// Decide which of two candidate centroids is Left and which is Right.
pub trait IdentityStrategy: Send {
    /// `previous` is the last smoothed pair, `None` before the first pair.
    fn assign_identity(&self, previous: Option<&MarkerPair>, candidates: [Point; 2])
        -> MarkerPair;
}

/// Smaller x is Left. Equal x keeps detector order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortByX;

impl IdentityStrategy for SortByX {
    fn assign_identity(&self, _previous: Option<&MarkerPair>, [a, b]: [Point; 2]) -> MarkerPair {
        if b.x < a.x {
            MarkerPair { left: b, right: a }
        } else {
            MarkerPair { left: a, right: b }
        }
    }
}

/// Keep each slot on the candidate closest to its previous position.
///
/// Falls back to [`SortByX`] until a previous pair exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl IdentityStrategy for NearestNeighbor {
    fn assign_identity(&self, previous: Option<&MarkerPair>, candidates: [Point; 2]) -> MarkerPair {
        let Some(prev) = previous else {
            return SortByX.assign_identity(None, candidates);
        };
        let [a, b] = candidates;
        let straight = distance(&prev.left, &a) + distance(&prev.right, &b);
        let swapped = distance(&prev.left, &b) + distance(&prev.right, &a);
        if swapped < straight {
            MarkerPair { left: b, right: a }
        } else {
            MarkerPair { left: a, right: b }
        }
    }
}

/// Serializable selector for the identity strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    #[default]
    SortByX,
    NearestNeighbor,
}

impl IdentityPolicy {
    pub fn strategy(self) -> Box<dyn IdentityStrategy> {
        match self {
            IdentityPolicy::SortByX => Box::new(SortByX),
            IdentityPolicy::NearestNeighbor => Box::new(NearestNeighbor),
        }
    }
}
