//! Decoding of received wire messages.
//!
//! Receivers accept both the canonical five-token line and the older
//! two-token `x y` line.  Coordinates with a negative component decode as
//! an empty slot; everything else is clamped into `[0, 1]`.

use std::str::FromStr;

use crate::error::WireError;
use crate::gesture::GestureId;
use crate::landmark::HandCentroid;
use crate::signal::FrameSignal;

/// Layout a message arrived in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageForm {
    Canonical,
    Legacy,
}

/// A received message, normalized into a [`FrameSignal`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedSignal {
    pub signal: FrameSignal,
    pub form:   MessageForm,
}

impl DecodedSignal {
    pub fn parse(msg: &str) -> Result<DecodedSignal, WireError> {
        let tokens: Vec<&str> = msg.split_ascii_whitespace().collect();
        if tokens.len() < 2 {
            return Err(WireError::TooFewTokens { found: tokens.len() });
        }

        let number = |index: usize| -> Result<f64, WireError> {
            let token = tokens[index];
            match token.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(WireError::BadNumber { index, token: token.to_string() }),
            }
        };

        let slot0 = normalize(number(0)?, number(1)?);

        if tokens.len() < 5 {
            return Ok(DecodedSignal {
                signal: FrameSignal::new(slot0, HandCentroid::ABSENT, GestureId::None),
                form:   MessageForm::Legacy,
            });
        }

        let slot1 = normalize(number(2)?, number(3)?);
        let gesture = tokens[4]
            .parse::<u8>()
            .ok()
            .and_then(GestureId::from_code)
            .ok_or_else(|| WireError::BadGesture { token: tokens[4].to_string() })?;

        Ok(DecodedSignal {
            signal: FrameSignal::new(slot0, slot1, gesture),
            form:   MessageForm::Canonical,
        })
    }
}

impl FromStr for DecodedSignal {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecodedSignal::parse(s)
    }
}

fn normalize(x: f64, y: f64) -> HandCentroid {
    if x < 0.0 || y < 0.0 {
        HandCentroid::ABSENT
    } else {
        HandCentroid::new(x.min(1.0), y.min(1.0))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
