//! Geometric gesture classifier.
//!
//! Detects the "middle finger up, others curled" pose from a single frame of
//! landmarks.  The hand model's own gesture recognizer has no category for
//! it, so this runs as a fallback when the model reports nothing confident.
//!
//! # Algorithm
//!
//! All distances are measured from the wrist, so the test is independent of
//! hand size and distance from the camera:
//!
//! * **Extended**: `|middle_tip - wrist| > extension_ratio * |middle_mcp - wrist|`
//! * **Curled**: for each of index, ring and pinky tips,
//!   `|tip - wrist| < curl_ratio * |middle_tip - wrist|`
//!
//! Both comparisons are strict.

use crate::landmark::{distance, index, Hand};

/// Tips that must be folded for a match.
const CURLED_TIPS: [usize; 3] = [index::INDEX_TIP, index::RING_TIP, index::PINKY_TIP];

/// Ratios for the extension/curl tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierThresholds {
    /// Middle tip reach must exceed this multiple of the knuckle distance.
    pub extension_ratio: f64,
    /// Other tips must stay within this fraction of the middle tip reach.
    pub curl_ratio: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        ClassifierThresholds {
            extension_ratio: 1.5,
            curl_ratio:      0.7,
        }
    }
}

/// Distance from the wrist to the landmark at `idx`.
fn reach(hand: &Hand, idx: usize) -> f64 {
    distance(hand.at(idx), hand.wrist())
}

/// True if the hand shows an extended middle finger with the index, ring
/// and pinky fingers curled.
pub fn is_middle_finger(hand: &Hand, thresholds: &ClassifierThresholds) -> bool {
    let middle_reach = reach(hand, index::MIDDLE_TIP);
    let knuckle      = reach(hand, index::MIDDLE_MCP);

    let extended = middle_reach > thresholds.extension_ratio * knuckle;
    if !extended {
        return false;
    }

    let curl_limit = thresholds.curl_ratio * middle_reach;
    CURLED_TIPS.iter().all(|&tip| reach(hand, tip) < curl_limit)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
