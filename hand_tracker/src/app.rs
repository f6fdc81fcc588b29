//! Per-frame run loop.
//!
//! `Tracker` owns the pipeline and the sink.  Frames arrive from a
//! [`DetectionSource`] channel and are handled strictly in order, one
//! message out per frame.  A frame that fails validation is logged and
//! dropped; nothing is sent for it.

use std::io::{self, BufReader};

use anyhow::Result;

use hand_signal::{DetectionFrame, SignalPipeline, WireFormat};

use crate::config::{SourceConfig, TrackerConfig};
use crate::sink::{NullSink, TransportSink, UdpSink};
use crate::source::{spawn_detection_source, CommandSource, DetectionSource, JsonLinesSource, SimSource};

// ════════════════════════════════════════════════════════════════════════════
// RunStats
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Frames received from the source.
    pub frames:      u64,
    /// Messages handed to the sink successfully.
    pub sent:        u64,
    /// Frames dropped because the pipeline rejected them.
    pub skipped:     u64,
    pub send_errors: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Tracker
// ════════════════════════════════════════════════════════════════════════════

pub struct Tracker<K> {
    pipeline: SignalPipeline,
    format:   WireFormat,
    sink:     K,
    stats:    RunStats,
}

impl<K: TransportSink> Tracker<K> {
    pub fn new(pipeline: SignalPipeline, format: WireFormat, sink: K) -> Self {
        Tracker { pipeline, format, sink, stats: RunStats::default() }
    }

    /// Process one frame.  Returns the message that was handed to the sink,
    /// or `None` if the frame was skipped.
    pub fn handle_frame(&mut self, frame: &DetectionFrame) -> Option<String> {
        self.stats.frames += 1;

        let signal = match self.pipeline.process(frame) {
            Ok(s)  => s,
            Err(e) => {
                self.stats.skipped += 1;
                log::warn!("skipping frame {}: {}", self.stats.frames, e);
                return None;
            }
        };

        let msg = signal.encode(self.format);
        log::debug!(
            "frame {}: {} hand(s), gesture {} -> {:?}",
            self.stats.frames, signal.hand_count(), signal.gesture, msg
        );

        match self.sink.send(&msg) {
            Ok(())  => self.stats.sent += 1,
            Err(e)  => {
                self.stats.send_errors += 1;
                log::warn!("send failed for frame {}: {}", self.stats.frames, e);
            }
        }
        Some(msg)
    }

    pub fn stats(&self) -> RunStats { self.stats }

    pub fn sink(&self) -> &K { &self.sink }
}

// ════════════════════════════════════════════════════════════════════════════
// Wiring from config
// ════════════════════════════════════════════════════════════════════════════

pub fn build_source(cfg: &TrackerConfig) -> Result<Box<dyn DetectionSource>> {
    let source: Box<dyn DetectionSource> = match &cfg.source {
        SourceConfig::Stdin => {
            log::info!("reading detections from stdin");
            Box::new(JsonLinesSource::new(BufReader::new(io::stdin())))
        }
        SourceConfig::Command { program, args, wait_ready } => {
            Box::new(CommandSource::spawn(program, args, *wait_ready)?)
        }
        SourceConfig::Sim { fps } => {
            log::info!("simulating detections at {} fps", fps);
            Box::new(SimSource { fps: *fps, frames: cfg.max_frames })
        }
    };
    Ok(source)
}

pub fn build_sink(cfg: &TrackerConfig) -> Result<Box<dyn TransportSink>> {
    if cfg.dry_run {
        log::info!("dry run: messages are not sent");
        return Ok(Box::new(NullSink));
    }
    Ok(Box::new(UdpSink::connect(cfg.bind_addr()?, cfg.target_addr()?)?))
}

/// Drain `source` through the pipeline into `sink` until the source ends or
/// `max_frames` is reached.
pub fn run<S, K>(cfg: &TrackerConfig, source: S, sink: K) -> Result<RunStats>
where
    S: DetectionSource,
    K: TransportSink,
{
    cfg.validate()?;

    // Held until we stop reading; dropping it shuts down a model bridge
    // whose thread may still be blocked on its output.
    let _bridge = source.bridge_guard();
    let rx = spawn_detection_source(source);
    let mut tracker = Tracker::new(
        SignalPipeline::new(cfg.pipeline_config()),
        cfg.wire_format,
        sink,
    );

    for frame in rx.iter() {
        tracker.handle_frame(&frame);
        if cfg.max_frames.is_some_and(|max| tracker.stats().frames >= max) {
            break;
        }
    }

    let stats = tracker.stats();
    log::info!(
        "done: {} frames, {} sent, {} skipped, {} send errors",
        stats.frames, stats.sent, stats.skipped, stats.send_errors
    );
    Ok(stats)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
