//! Error types for the landmark pipeline and the wire codec.

use thiserror::Error;

/// Failure while turning one detection frame into a signal.
///
/// Every variant is local to a single frame: the caller skips that frame's
/// output and carries on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// A hand did not carry exactly [`LANDMARK_COUNT`](crate::landmark::LANDMARK_COUNT) points.
    #[error("malformed landmark set: expected 21 landmarks, found {found}")]
    MalformedLandmarkSet { found: usize },
}

/// Failure while decoding a received wire message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("expected at least 2 tokens, found {found}")]
    TooFewTokens { found: usize },

    #[error("token {index} is not a number: {token:?}")]
    BadNumber { index: usize, token: String },

    #[error("gesture field {token:?} is not a gesture id in 0..=7")]
    BadGesture { token: String },
}

pub type SignalResult<T> = Result<T, SignalError>;
