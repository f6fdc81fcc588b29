//! The landmark-to-signal pipeline: `DetectionFrame -> FrameSignal`.
//!
//! [`SignalPipeline::process`] is a pure function of its input frame.  It
//! keeps no state between calls, so a frame can never be influenced by the
//! one before it.  Hands fill slots in the order the model reported them;
//! there is no identity tracking across frames.

use crate::error::SignalResult;
use crate::frame::{DetectedHand, DetectionFrame};
use crate::gesture::{resolve_gesture, ResolverConfig};
use crate::landmark::{Hand, HandCentroid};
use crate::signal::{FrameSignal, SLOT_COUNT};

/// Pipeline settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Hands beyond this many are ignored.  Never more than [`SLOT_COUNT`].
    pub max_hands: usize,
    pub resolver:  ResolverConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_hands: SLOT_COUNT,
            resolver:  ResolverConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignalPipeline {
    config: PipelineConfig,
}

impl SignalPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        SignalPipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Turn one frame's detections into a signal.
    ///
    /// Every hand inside the slot cap is validated before anything is
    /// produced; one malformed hand fails the whole frame, so no partial
    /// signal is ever returned.
    pub fn process(&self, frame: &DetectionFrame) -> SignalResult<FrameSignal> {
        let cap = self.config.max_hands.min(SLOT_COUNT);
        if frame.hands.len() > cap {
            log::debug!(
                "frame has {} hands, using the first {}",
                frame.hands.len(), cap
            );
        }
        let detected = &frame.hands[..frame.hands.len().min(cap)];

        let hands = detected
            .iter()
            .map(|h| Hand::from_landmarks(&h.landmarks))
            .collect::<SignalResult<Vec<Hand>>>()?;

        let mut slots = [HandCentroid::ABSENT; SLOT_COUNT];
        for (slot, hand) in slots.iter_mut().zip(&hands) {
            *slot = hand.centroid();
        }

        let label   = detected.first().and_then(DetectedHand::top_gesture);
        let gesture = resolve_gesture(label, hands.first(), &self.config.resolver);

        Ok(FrameSignal { slots, gesture })
    }
}

/// [`SignalPipeline::process`] with default settings.
pub fn process_frame(frame: &DetectionFrame) -> SignalResult<FrameSignal> {
    SignalPipeline::default().process(frame)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
