//! # hand_tracker
//!
//! Drives the [`hand_signal`] pipeline from a live detection source and
//! sends one UDP datagram per frame to a local receiver.
//!
//! ## Data flow
//!
//! ```text
//! DetectionSource ──mpsc──► Tracker ──► SignalPipeline ──► encode ──► TransportSink
//!  (bridge / stdin / sim)    (one frame at a time, in order)            (UDP, fire-and-forget)
//! ```
//!
//! ## Sources
//!
//! | Source | Input |
//! |---|---|
//! | `stdin` | JSON lines piped from a model bridge |
//! | `command` | JSON lines from a spawned bridge process |
//! | `sim` | built-in synthetic hands, no camera needed |
//!
//! ## Binaries
//!
//! * `hand_tracker`: the sender.  `hand_tracker --sim` runs without hardware.
//! * `signal_listen`: binds the receiver port and logs what arrives.

pub mod app;
pub mod config;
pub mod monitor;
pub mod sink;
pub mod source;

/// Install the `env_logger` backend, `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
