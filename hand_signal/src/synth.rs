//! Synthetic hand poses.
//!
//! Landmark sets shaped like real detections, used by the simulated
//! detection source and by tests.  Each pose is a table of offsets from the
//! wrist in normalized image units (y grows downward, so fingers pointing up
//! have negative y offsets).

use crate::landmark::{Landmark, LANDMARK_COUNT};

type Offsets = [(f64, f64); LANDMARK_COUNT];

/// Middle finger up, index/ring/pinky folded into the palm.
const MIDDLE_FINGER: Offsets = [
    ( 0.000,  0.000), // wrist
    (-0.040, -0.030), (-0.070, -0.070), (-0.060, -0.110), (-0.030, -0.120), // thumb
    (-0.040, -0.190), (-0.040, -0.240), (-0.030, -0.190), (-0.030, -0.150), // index
    ( 0.000, -0.200), ( 0.000, -0.300), ( 0.000, -0.380), ( 0.000, -0.450), // middle
    ( 0.040, -0.190), ( 0.040, -0.230), ( 0.035, -0.180), ( 0.030, -0.150), // ring
    ( 0.080, -0.170), ( 0.080, -0.200), ( 0.075, -0.160), ( 0.070, -0.140), // pinky
];

/// All five fingers extended and spread.
const OPEN_PALM: Offsets = [
    ( 0.000,  0.000),
    (-0.050, -0.040), (-0.100, -0.090), (-0.140, -0.130), (-0.170, -0.170),
    (-0.040, -0.190), (-0.050, -0.280), (-0.055, -0.350), (-0.060, -0.420),
    ( 0.000, -0.200), ( 0.000, -0.300), ( 0.000, -0.380), ( 0.000, -0.450),
    ( 0.040, -0.190), ( 0.045, -0.280), ( 0.050, -0.350), ( 0.055, -0.410),
    ( 0.080, -0.170), ( 0.090, -0.240), ( 0.095, -0.290), ( 0.100, -0.340),
];

/// Every finger folded.
const FIST: Offsets = [
    ( 0.000,  0.000),
    (-0.040, -0.030), (-0.070, -0.070), (-0.060, -0.120), (-0.020, -0.140),
    (-0.040, -0.190), (-0.040, -0.230), (-0.030, -0.180), (-0.030, -0.150),
    ( 0.000, -0.200), ( 0.000, -0.240), ( 0.000, -0.190), ( 0.000, -0.150),
    ( 0.040, -0.190), ( 0.040, -0.230), ( 0.035, -0.180), ( 0.030, -0.150),
    ( 0.080, -0.170), ( 0.080, -0.200), ( 0.075, -0.160), ( 0.070, -0.140),
];

/// Named synthetic poses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    MiddleFinger,
    OpenPalm,
    Fist,
}

impl Pose {
    fn offsets(self) -> &'static Offsets {
        match self {
            Pose::MiddleFinger => &MIDDLE_FINGER,
            Pose::OpenPalm     => &OPEN_PALM,
            Pose::Fist         => &FIST,
        }
    }

    /// Place the pose with its wrist at `(wx, wy)`, scaled by `scale`.
    pub fn at(self, wx: f64, wy: f64, scale: f64) -> Vec<Landmark> {
        self.offsets()
            .iter()
            .map(|&(dx, dy)| Landmark::new(wx + dx * scale, wy + dy * scale))
            .collect()
    }
}

/// `LANDMARK_COUNT` copies of the same point.
pub fn uniform(x: f64, y: f64) -> Vec<Landmark> {
    vec![Landmark::new(x, y); LANDMARK_COUNT]
}
