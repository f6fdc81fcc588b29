//! Landmarks, validated hands and the centroid aggregator.
//!
//! Coordinates are normalized to the frame: `x` and `y` lie in `[0, 1]`
//! relative to width and height.  `z` is carried through deserialization
//! but nothing in this crate reads it.

use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices (MediaPipe hand model convention)
// ════════════════════════════════════════════════════════════════════════════

/// Number of landmarks the hand model produces per hand.
pub const LANDMARK_COUNT: usize = 21;

pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single normalized keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Landmark { x, y, z: 0.0 }
    }
}

/// Planar Euclidean distance between two landmarks (`z` ignored).
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// The full ordered landmark set of one detected hand.
///
/// Only constructible through [`Hand::from_landmarks`], so every `Hand` holds
/// exactly [`LANDMARK_COUNT`] points.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    /// Validate a raw landmark slice from the model.
    pub fn from_landmarks(points: &[Landmark]) -> SignalResult<Self> {
        let landmarks = <[Landmark; LANDMARK_COUNT]>::try_from(points)
            .map_err(|_| SignalError::MalformedLandmarkSet { found: points.len() })?;
        Ok(Hand { landmarks })
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Landmark at an anatomical index (see [`index`]).
    pub fn at(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }

    pub fn wrist(&self) -> &Landmark { self.at(index::WRIST) }

    /// Mean position of all 21 landmarks.
    pub fn centroid(&self) -> HandCentroid {
        mean_xy(&self.landmarks)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandCentroid
// ════════════════════════════════════════════════════════════════════════════

/// Tracked point of a hand, or the `(-1, -1)` sentinel for an empty slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandCentroid {
    pub x: f64,
    pub y: f64,
}

impl HandCentroid {
    /// Sentinel meaning "no hand in this slot".
    pub const ABSENT: HandCentroid = HandCentroid { x: -1.0, y: -1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        HandCentroid { x, y }
    }

    /// True only for the exact sentinel.  A real hand at the frame edge
    /// can have a slightly negative centroid and is still present.
    pub fn is_absent(&self) -> bool {
        *self == HandCentroid::ABSENT
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }
}

impl Default for HandCentroid {
    fn default() -> Self { HandCentroid::ABSENT }
}

/// Arithmetic mean of any non-empty landmark set.
pub fn centroid(points: &[Landmark]) -> SignalResult<HandCentroid> {
    if points.is_empty() {
        return Err(SignalError::MalformedLandmarkSet { found: 0 });
    }
    Ok(mean_xy(points))
}

fn mean_xy(points: &[Landmark]) -> HandCentroid {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    HandCentroid::new(sx / n, sy / n)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
