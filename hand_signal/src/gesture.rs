//! Gesture identifiers and the resolver that picks one per frame.
//!
//! Two sources can name a gesture: the hand model's own recognizer (a
//! category name with a confidence score) and the geometric classifier in
//! [`crate::classifier`].  [`resolve_gesture`] merges them with a fixed
//! precedence:
//!
//! 1. A model label scoring above `min_score` wins outright.  Its category
//!    is mapped through [`GestureId::from_category`]; unknown names give
//!    [`GestureId::None`] and do **not** fall through to rule 2.
//! 2. Otherwise, if slot 0 holds a hand matching the middle-finger pose,
//!    the result is [`GestureId::MiddleFinger`].
//! 3. Otherwise [`GestureId::None`].
//!
//! Only hand slot 0 is ever considered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::{is_middle_finger, ClassifierThresholds};
use crate::landmark::Hand;

// ════════════════════════════════════════════════════════════════════════════
// GestureId
// ════════════════════════════════════════════════════════════════════════════

/// Discrete gesture code sent on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GestureId {
    #[default]
    None         = 0,
    Fist         = 1,
    Victory      = 2,
    ThumbUp      = 3,
    ThumbDown    = 4,
    OpenPalm     = 5,
    PointingUp   = 6,
    MiddleFinger = 7,
}

impl GestureId {
    pub const ALL: [GestureId; 8] = [
        GestureId::None,
        GestureId::Fist,
        GestureId::Victory,
        GestureId::ThumbUp,
        GestureId::ThumbDown,
        GestureId::OpenPalm,
        GestureId::PointingUp,
        GestureId::MiddleFinger,
    ];

    /// Integer code as written in the wire message.
    pub fn code(self) -> u8 { self as u8 }

    pub fn from_code(code: u8) -> Option<GestureId> {
        GestureId::ALL.get(code as usize).copied()
    }

    /// Map a hand-model category name.  Names outside the model's known
    /// vocabulary map to [`GestureId::None`].
    pub fn from_category(name: &str) -> GestureId {
        match name {
            "Closed_Fist" => GestureId::Fist,
            "Victory"     => GestureId::Victory,
            "Thumb_Up"    => GestureId::ThumbUp,
            "Thumb_Down"  => GestureId::ThumbDown,
            "Open_Palm"   => GestureId::OpenPalm,
            "Pointing_Up" => GestureId::PointingUp,
            _             => GestureId::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GestureId::None         => "NONE",
            GestureId::Fist         => "FIST",
            GestureId::Victory      => "VICTORY",
            GestureId::ThumbUp      => "THUMB_UP",
            GestureId::ThumbDown    => "THUMB_DOWN",
            GestureId::OpenPalm     => "OPEN_PALM",
            GestureId::PointingUp   => "POINTING_UP",
            GestureId::MiddleFinger => "MIDDLE_FINGER",
        }
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel
// ════════════════════════════════════════════════════════════════════════════

/// One ranked guess from the hand model's gesture recognizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureLabel {
    pub category_name: String,
    /// Confidence in `[0, 1]`.
    pub score: f64,
}

impl GestureLabel {
    pub fn new(category_name: impl Into<String>, score: f64) -> Self {
        GestureLabel { category_name: category_name.into(), score }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Resolver
// ════════════════════════════════════════════════════════════════════════════

/// Settings for [`resolve_gesture`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolverConfig {
    /// A model label must score strictly above this to be used.
    pub min_score:  f64,
    pub thresholds: ClassifierThresholds,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            min_score:  0.5,
            thresholds: ClassifierThresholds::default(),
        }
    }
}

/// Pick the gesture for one frame from slot 0's model label and landmarks.
pub fn resolve_gesture(
    label: Option<&GestureLabel>,
    hand0: Option<&Hand>,
    cfg:   &ResolverConfig,
) -> GestureId {
    if let Some(label) = label.filter(|l| l.score > cfg.min_score) {
        return GestureId::from_category(&label.category_name);
    }

    match hand0 {
        Some(hand) if is_middle_finger(hand, &cfg.thresholds) => GestureId::MiddleFinger,
        _ => GestureId::None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{self, Pose};

    fn middle_finger_hand() -> Hand {
        Hand::from_landmarks(&Pose::MiddleFinger.at(0.5, 0.8, 1.0)).unwrap()
    }

    fn open_hand() -> Hand {
        Hand::from_landmarks(&Pose::OpenPalm.at(0.5, 0.8, 1.0)).unwrap()
    }

    // ── GestureId ────────────────────────────────────────────────────────
    #[test]
    fn codes_are_stable() {
        assert_eq!(GestureId::None.code(), 0);
        assert_eq!(GestureId::Fist.code(), 1);
        assert_eq!(GestureId::Victory.code(), 2);
        assert_eq!(GestureId::ThumbUp.code(), 3);
        assert_eq!(GestureId::ThumbDown.code(), 4);
        assert_eq!(GestureId::OpenPalm.code(), 5);
        assert_eq!(GestureId::PointingUp.code(), 6);
        assert_eq!(GestureId::MiddleFinger.code(), 7);
    }

    #[test]
    fn from_code_inverts_code() {
        for g in GestureId::ALL {
            assert_eq!(GestureId::from_code(g.code()), Some(g));
        }
        assert_eq!(GestureId::from_code(8), None);
    }

    #[test]
    fn category_table() {
        assert_eq!(GestureId::from_category("Closed_Fist"), GestureId::Fist);
        assert_eq!(GestureId::from_category("Victory"),     GestureId::Victory);
        assert_eq!(GestureId::from_category("Thumb_Up"),    GestureId::ThumbUp);
        assert_eq!(GestureId::from_category("Thumb_Down"),  GestureId::ThumbDown);
        assert_eq!(GestureId::from_category("Open_Palm"),   GestureId::OpenPalm);
        assert_eq!(GestureId::from_category("Pointing_Up"), GestureId::PointingUp);
    }

    #[test]
    fn unknown_category_is_none() {
        assert_eq!(GestureId::from_category("ILoveYou"), GestureId::None);
        assert_eq!(GestureId::from_category("closed_fist"), GestureId::None);
        assert_eq!(GestureId::from_category(""), GestureId::None);
    }

    // ── precedence ───────────────────────────────────────────────────────
    #[test]
    fn confident_label_beats_geometry() {
        let label = GestureLabel::new("Closed_Fist", 0.9);
        let h = middle_finger_hand();
        let g = resolve_gesture(Some(&label), Some(&h), &ResolverConfig::default());
        assert_eq!(g, GestureId::Fist);
    }

    #[test]
    fn confident_unknown_label_does_not_fall_back() {
        let label = GestureLabel::new("None", 0.95);
        let h = middle_finger_hand();
        let g = resolve_gesture(Some(&label), Some(&h), &ResolverConfig::default());
        assert_eq!(g, GestureId::None);
    }

    #[test]
    fn weak_label_falls_back_to_geometry() {
        let label = GestureLabel::new("Victory", 0.3);
        let h = middle_finger_hand();
        let g = resolve_gesture(Some(&label), Some(&h), &ResolverConfig::default());
        assert_eq!(g, GestureId::MiddleFinger);
    }

    #[test]
    fn score_threshold_is_strict() {
        let cfg = ResolverConfig::default();
        let h = open_hand();
        let at   = GestureLabel::new("Victory", 0.5);
        let over = GestureLabel::new("Victory", 0.5000001);
        assert_eq!(resolve_gesture(Some(&at),   Some(&h), &cfg), GestureId::None);
        assert_eq!(resolve_gesture(Some(&over), Some(&h), &cfg), GestureId::Victory);
    }

    #[test]
    fn no_label_uses_geometry() {
        let h = middle_finger_hand();
        assert_eq!(
            resolve_gesture(None, Some(&h), &ResolverConfig::default()),
            GestureId::MiddleFinger
        );
    }

    #[test]
    fn no_label_no_match_is_none() {
        let h = open_hand();
        assert_eq!(resolve_gesture(None, Some(&h), &ResolverConfig::default()), GestureId::None);
        let flat = Hand::from_landmarks(&synth::uniform(0.5, 0.5)).unwrap();
        assert_eq!(resolve_gesture(None, Some(&flat), &ResolverConfig::default()), GestureId::None);
    }

    #[test]
    fn empty_slot_is_none() {
        assert_eq!(resolve_gesture(None, None, &ResolverConfig::default()), GestureId::None);
    }

    #[test]
    fn confident_label_without_hand_still_counts() {
        let label = GestureLabel::new("Thumb_Down", 0.8);
        assert_eq!(
            resolve_gesture(Some(&label), None, &ResolverConfig::default()),
            GestureId::ThumbDown
        );
    }
}
