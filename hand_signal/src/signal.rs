//! Per-frame signal and its text encoding.
//!
//! ## Wire format
//!
//! One ASCII line per frame, space separated, no trailing newline.
//!
//! | Form | Layout |
//! |---|---|
//! | Canonical | `x1 y1 x2 y2 gesture`: four `{:.6}` floats and a bare integer 0–7 |
//! | Legacy | `x y`: slot 0 only, `-1 -1` when no hand |
//!
//! An empty slot is written as `-1.000000 -1.000000` in the canonical form.
//! The receiver tokenizes on spaces, so the six-digit fixed point layout is
//! part of the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gesture::GestureId;
use crate::landmark::HandCentroid;

/// Number of hand slots carried per frame.
pub const SLOT_COUNT: usize = 2;

/// Result of one frame: two hand slots plus the slot-0 gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSignal {
    /// Slot 0 is the first hand the model reported, slot 1 the second.
    pub slots:   [HandCentroid; SLOT_COUNT],
    pub gesture: GestureId,
}

/// Which wire layout to emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Canonical,
    /// Two-token single-hand form, kept for receivers that predate the
    /// canonical layout.
    Legacy,
}

impl FrameSignal {
    /// No hands, no gesture.
    pub const IDLE: FrameSignal = FrameSignal {
        slots:   [HandCentroid::ABSENT; SLOT_COUNT],
        gesture: GestureId::None,
    };

    pub fn new(slot0: HandCentroid, slot1: HandCentroid, gesture: GestureId) -> Self {
        FrameSignal { slots: [slot0, slot1], gesture }
    }

    /// Number of occupied slots.
    pub fn hand_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_present()).count()
    }

    pub fn encode(&self, format: WireFormat) -> String {
        match format {
            WireFormat::Canonical => self.to_string(),
            WireFormat::Legacy => {
                let s = self.slots[0];
                if s.is_absent() {
                    "-1 -1".to_string()
                } else {
                    format!("{:.6} {:.6}", s.x, s.y)
                }
            }
        }
    }
}

impl Default for FrameSignal {
    fn default() -> Self { FrameSignal::IDLE }
}

impl fmt::Display for FrameSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.slots;
        write!(
            f,
            "{:.6} {:.6} {:.6} {:.6} {}",
            a.x, a.y, b.x, b.y, self.gesture.code()
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_frame_encoding() {
        assert_eq!(
            FrameSignal::IDLE.encode(WireFormat::Canonical),
            "-1.000000 -1.000000 -1.000000 -1.000000 0"
        );
    }

    #[test]
    fn one_hand_encoding() {
        let s = FrameSignal::new(
            HandCentroid::new(0.5, 0.5),
            HandCentroid::ABSENT,
            GestureId::None,
        );
        assert_eq!(s.encode(WireFormat::Canonical), "0.500000 0.500000 -1.000000 -1.000000 0");
    }

    #[test]
    fn two_hands_and_gesture() {
        let s = FrameSignal::new(
            HandCentroid::new(0.123_456_7, 0.9),
            HandCentroid::new(0.0, 1.0),
            GestureId::MiddleFinger,
        );
        assert_eq!(s.to_string(), "0.123457 0.900000 0.000000 1.000000 7");
    }

    #[test]
    fn canonical_has_five_tokens_and_no_newline() {
        let s = FrameSignal::new(
            HandCentroid::new(0.31, 0.62),
            HandCentroid::new(0.77, 0.18),
            GestureId::OpenPalm,
        );
        let line = s.encode(WireFormat::Canonical);
        assert!(!line.ends_with('\n'));
        let tokens: Vec<&str> = line.split(' ').collect();
        assert_eq!(tokens.len(), 5);
        for t in &tokens[..4] {
            let (_, frac) = t.split_once('.').unwrap();
            assert_eq!(frac.len(), 6, "token {}", t);
        }
        assert_eq!(tokens[4], "5");
    }

    #[test]
    fn off_frame_centroid_is_written_as_is() {
        let s = FrameSignal::new(
            HandCentroid::new(-0.011_429, 0.5),
            HandCentroid::ABSENT,
            GestureId::None,
        );
        assert_eq!(s.hand_count(), 1);
        assert_eq!(s.to_string(), "-0.011429 0.500000 -1.000000 -1.000000 0");
        assert_eq!(s.encode(WireFormat::Legacy), "-0.011429 0.500000");
    }

    #[test]
    fn legacy_encoding() {
        let s = FrameSignal::new(
            HandCentroid::new(0.45, 0.62),
            HandCentroid::new(0.1, 0.1),
            GestureId::Fist,
        );
        assert_eq!(s.encode(WireFormat::Legacy), "0.450000 0.620000");
        assert_eq!(FrameSignal::IDLE.encode(WireFormat::Legacy), "-1 -1");
    }

    #[test]
    fn hand_count() {
        assert_eq!(FrameSignal::IDLE.hand_count(), 0);
        let s = FrameSignal::new(HandCentroid::new(0.2, 0.2), HandCentroid::ABSENT, GestureId::None);
        assert_eq!(s.hand_count(), 1);
    }
}
