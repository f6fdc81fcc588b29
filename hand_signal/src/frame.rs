//! Raw per-frame detection results as delivered by the hand model.

use serde::{Deserialize, Serialize};

use crate::gesture::GestureLabel;
use crate::landmark::Landmark;

/// One hand as reported by the model, before validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    /// Expected to hold exactly 21 points; checked by the pipeline.
    pub landmarks: Vec<Landmark>,
    /// Ranked gesture guesses, best first.  May be empty.
    #[serde(default)]
    pub gestures: Vec<GestureLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
}

impl DetectedHand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        DetectedHand { landmarks, ..Default::default() }
    }

    pub fn with_gesture(mut self, label: GestureLabel) -> Self {
        self.gestures.push(label);
        self
    }

    /// The model's best guess, if it made one.
    pub fn top_gesture(&self) -> Option<&GestureLabel> {
        self.gestures.first()
    }
}

/// Everything the model found in one camera frame, in detection order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

impl DetectionFrame {
    pub fn empty() -> Self { DetectionFrame::default() }

    pub fn with_hands(hands: Vec<DetectedHand>) -> Self {
        DetectionFrame { hands }
    }
}
