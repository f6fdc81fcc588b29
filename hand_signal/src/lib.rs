//! # hand_signal
//!
//! Turns per-frame hand landmark detections into a compact control signal:
//! up to two normalized hand positions plus one discrete gesture, encoded
//! as a single text line for a datagram channel.
//!
//! ## Pipeline
//!
//! ```text
//! DetectionFrame ──► Hand::from_landmarks (per hand, max 2)
//!                ──► centroid             (per hand → slot)
//!                ──► resolve_gesture      (slot 0 only: model label, else geometry)
//!                ──► FrameSignal::encode  ("x1 y1 x2 y2 gesture")
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use hand_signal::{DetectedHand, DetectionFrame, SignalPipeline, WireFormat, synth};
//!
//! let frame = DetectionFrame::with_hands(vec![DetectedHand::new(synth::uniform(0.5, 0.5))]);
//! let signal = SignalPipeline::default().process(&frame).unwrap();
//! assert_eq!(
//!     signal.encode(WireFormat::Canonical),
//!     "0.500000 0.500000 -1.000000 -1.000000 0",
//! );
//! ```
//!
//! ## Gesture ids
//!
//! | Id | Gesture | Source |
//! |---|---|---|
//! | 0 | none | |
//! | 1 | fist | model `Closed_Fist` |
//! | 2 | victory | model `Victory` |
//! | 3 | thumb up | model `Thumb_Up` |
//! | 4 | thumb down | model `Thumb_Down` |
//! | 5 | open palm | model `Open_Palm` |
//! | 6 | pointing up | model `Pointing_Up` |
//! | 7 | middle finger | geometric classifier |

pub mod classifier;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod landmark;
pub mod pipeline;
pub mod signal;
pub mod synth;
pub mod wire;

pub use classifier::{is_middle_finger, ClassifierThresholds};
pub use error::{SignalError, SignalResult, WireError};
pub use frame::{DetectedHand, DetectionFrame};
pub use gesture::{resolve_gesture, GestureId, GestureLabel, ResolverConfig};
pub use landmark::{centroid, distance, Hand, HandCentroid, Landmark, LANDMARK_COUNT};
pub use pipeline::{process_frame, PipelineConfig, SignalPipeline};
pub use signal::{FrameSignal, WireFormat, SLOT_COUNT};
pub use wire::{DecodedSignal, MessageForm};
