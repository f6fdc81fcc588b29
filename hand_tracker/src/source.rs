//! Detection sources: where per-frame hand detections come from.
//!
//! The public interface is [`DetectionFrame`] delivered over an `mpsc`
//! channel.  The run loop doesn't need to know whether frames came from an
//! external model process, a piped file, or the built-in simulator.  Each
//! source runs on its own thread and sends frames in capture order; the
//! consumer handles them strictly one at a time.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use hand_signal::synth::Pose;
use hand_signal::{DetectedHand, DetectionFrame, GestureLabel};

// ════════════════════════════════════════════════════════════════════════════
// DetectionSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`DetectionFrame`]s over a channel.
///
/// `run` returns when the source is exhausted or the receiver hangs up.
pub trait DetectionSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<DetectionFrame>);

    /// A handle the consumer keeps while it reads frames.  Dropping it stops
    /// any external process behind the source, even while the source thread
    /// is blocked waiting for input.
    fn bridge_guard(&self) -> Option<BridgeGuard> { None }
}

impl DetectionSource for Box<dyn DetectionSource> {
    fn run(self: Box<Self>, tx: Sender<DetectionFrame>) {
        (*self).run(tx)
    }

    fn bridge_guard(&self) -> Option<BridgeGuard> {
        (**self).bridge_guard()
    }
}

/// Spawn a detection source on its own thread and return the receiving end.
pub fn spawn_detection_source<S: DetectionSource>(source: S) -> Receiver<DetectionFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource: one JSON detection result per line
// ════════════════════════════════════════════════════════════════════════════

/// Line format written by the model bridge.
///
/// ```json
/// {"hands":[{"landmarks":[{"x":0.51,"y":0.62,"z":0.0}, ...],
///            "gestures":[{"category_name":"Open_Palm","score":0.91}],
///            "handedness":"Right"}]}
/// ```
///
/// A bridge that fails on a frame reports `{"error": "..."}` instead.
#[derive(Debug, Deserialize)]
struct BridgeMessage {
    #[serde(default)]
    hands: Vec<DetectedHand>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one line.  Blank lines and bridge-reported errors yield `None`.
pub fn parse_line(line: &str) -> Result<Option<DetectionFrame>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let msg: BridgeMessage = serde_json::from_str(line)
        .with_context(|| format!("failed to parse detection line: {}", line))?;
    if let Some(error) = msg.error {
        log::warn!("model bridge error: {}", error);
        return Ok(None);
    }
    Ok(Some(DetectionFrame::with_hands(msg.hands)))
}

/// Reads detection frames as JSON lines from any buffered reader
/// (stdin, a file, a child process).
pub struct JsonLinesSource<R> {
    reader: R,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource { reader }
    }
}

impl<R: BufRead + Send + 'static> DetectionSource for JsonLinesSource<R> {
    fn run(self: Box<Self>, tx: Sender<DetectionFrame>) {
        let mut reader = self.reader;
        let mut buf = Vec::new();
        let mut n = 0u64;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0)  => break,
                Ok(_)  => n += 1,
                Err(e) => {
                    log::error!("detection input read failed: {}", e);
                    return;
                }
            }
            // A bad line costs one frame, never the whole input.
            let line = match std::str::from_utf8(&buf) {
                Ok(l)  => l,
                Err(e) => {
                    log::warn!("line {}: not UTF-8: {}", n, e);
                    continue;
                }
            };
            log::trace!("line {}: {}", n, line.trim_end());
            match parse_line(line) {
                Ok(Some(frame)) => {
                    if tx.send(frame).is_err() { return; }
                }
                Ok(None) => continue,
                Err(e)   => log::warn!("line {}: {:#}", n, e),
            }
        }
        log::info!("detection input closed");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CommandSource: external model bridge process
// ════════════════════════════════════════════════════════════════════════════

/// Shared handle on a bridge process.  Dropping any clone kills and reaps
/// the child; its stdout then closes and the reading thread sees EOF.
#[derive(Clone)]
pub struct BridgeGuard(Arc<Mutex<Child>>);

impl BridgeGuard {
    /// Whether the bridge process is still alive.
    pub fn is_running(&self) -> bool {
        match self.0.lock() {
            Ok(mut child) => matches!(child.try_wait(), Ok(None)),
            Err(_)        => false,
        }
    }
}

impl Drop for BridgeGuard {
    fn drop(&mut self) {
        if let Ok(mut child) = self.0.lock() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Runs an external model bridge (e.g. a MediaPipe helper script) and
/// reads its stdout as JSON lines.
pub struct CommandSource {
    child: BridgeGuard,
    lines: JsonLinesSource<BufReader<ChildStdout>>,
}

impl CommandSource {
    /// Start `program` with `args`.  With `wait_ready`, the first line the
    /// child prints must be `READY`.
    pub fn spawn(program: &str, args: &[String], wait_ready: bool) -> Result<Self> {
        log::info!("starting model bridge: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start model bridge {:?}", program))?;

        let stdout = child.stdout.take().context("model bridge has no stdout")?;
        let child = BridgeGuard(Arc::new(Mutex::new(child)));
        let mut reader = BufReader::new(stdout);

        if wait_ready {
            let mut first = String::new();
            reader
                .read_line(&mut first)
                .context("failed to read from model bridge")?;
            if first.trim() != "READY" {
                bail!("model bridge did not signal ready, got: {:?}", first.trim());
            }
            log::info!("model bridge ready");
        }

        Ok(CommandSource { child, lines: JsonLinesSource::new(reader) })
    }
}

impl DetectionSource for CommandSource {
    fn run(self: Box<Self>, tx: Sender<DetectionFrame>) {
        let CommandSource { child, lines } = *self;
        Box::new(lines).run(tx);
        drop(child);
    }

    fn bridge_guard(&self) -> Option<BridgeGuard> {
        Some(self.child.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimSource: synthetic frames, no camera needed
// ════════════════════════════════════════════════════════════════════════════

/// Frames spent in each simulated phase.
const SIM_PHASE_FRAMES: u64 = 60;

/// Generates a repeating script of synthetic detections:
///
/// | Phase | Content |
/// |---|---|
/// | 0 | no hands |
/// | 1 | open palm, model label `Open_Palm` |
/// | 2 | middle finger, no model label |
/// | 3 | two hands: fist (`Closed_Fist`) and open palm |
///
/// Hands drift along an ellipse so the centroid changes every frame.
pub struct SimSource {
    pub fps:    f64,
    /// Stop after this many frames; `None` runs until the receiver hangs up.
    pub frames: Option<u64>,
}

impl SimSource {
    pub fn new(fps: f64) -> Self {
        SimSource { fps, frames: None }
    }
}

/// Sleep between simulated frames, `None` for a rate that is not positive
/// and finite.
fn sim_period(fps: f64) -> Option<Duration> {
    if fps > 0.0 && fps.is_finite() {
        Duration::try_from_secs_f64(1.0 / fps).ok()
    } else {
        None
    }
}

/// The `i`-th simulated frame.
pub fn sim_frame(i: u64) -> DetectionFrame {
    let angle = i as f64 * 0.05;
    let wx = 0.5 + 0.2 * angle.cos();
    let wy = 0.75 + 0.05 * angle.sin();
    const SCALE: f64 = 0.6;

    let hands = match (i / SIM_PHASE_FRAMES) % 4 {
        0 => vec![],
        1 => vec![
            DetectedHand::new(Pose::OpenPalm.at(wx, wy, SCALE))
                .with_gesture(GestureLabel::new("Open_Palm", 0.85)),
        ],
        2 => vec![DetectedHand::new(Pose::MiddleFinger.at(wx, wy, SCALE))],
        _ => vec![
            DetectedHand::new(Pose::Fist.at(wx, wy, SCALE))
                .with_gesture(GestureLabel::new("Closed_Fist", 0.9)),
            DetectedHand::new(Pose::OpenPalm.at(1.0 - wx, wy, SCALE)),
        ],
    };
    DetectionFrame::with_hands(hands)
}

impl DetectionSource for SimSource {
    fn run(self: Box<Self>, tx: Sender<DetectionFrame>) {
        let Some(period) = sim_period(self.fps) else {
            log::error!("sim fps {} is not a usable rate", self.fps);
            return;
        };
        let mut i = 0u64;
        loop {
            if self.frames.is_some_and(|n| i >= n) { return; }
            if tx.send(sim_frame(i)).is_err() { return; }
            i += 1;
            thread::sleep(period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_signal::{process_frame, GestureId};
    use std::io::Cursor;

    fn hand_json(x: f64, y: f64, n: usize) -> String {
        let pts: Vec<String> = (0..n)
            .map(|_| format!(r#"{{"x":{},"y":{},"z":0.0}}"#, x, y))
            .collect();
        format!(r#"{{"landmarks":[{}]}}"#, pts.join(","))
    }

    // ── parse_line ───────────────────────────────────────────────────────
    #[test]
    fn parses_hand_line() {
        let line = format!(r#"{{"hands":[{}]}}"#, hand_json(0.5, 0.5, 21));
        let frame = parse_line(&line).unwrap().unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].landmarks.len(), 21);
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(parse_line("   ").unwrap().is_none());
    }

    #[test]
    fn bridge_error_is_skipped() {
        assert!(parse_line(r#"{"hands":[],"error":"camera busy"}"#).unwrap().is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_line("not json").is_err());
    }

    // ── JsonLinesSource ──────────────────────────────────────────────────
    #[test]
    fn json_lines_source_delivers_in_order() {
        let input = format!(
            "{}\n\n{}\nbroken\n{}\n",
            format_args!(r#"{{"hands":[{}]}}"#, hand_json(0.1, 0.1, 21)),
            r#"{"hands":[]}"#,
            format_args!(r#"{{"hands":[{}]}}"#, hand_json(0.9, 0.9, 21)),
        );
        let rx = spawn_detection_source(JsonLinesSource::new(Cursor::new(input.into_bytes())));
        let frames: Vec<DetectionFrame> = rx.iter().collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].hands[0].landmarks[0].x, 0.1);
        assert!(frames[1].hands.is_empty());
        assert_eq!(frames[2].hands[0].landmarks[0].x, 0.9);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut input = b"{}\n{\"hands\":[],\"x\":\"".to_vec();
        input.push(0xff);
        input.extend_from_slice(b"\"}\n{}\n{}\n");
        let rx = spawn_detection_source(JsonLinesSource::new(Cursor::new(input)));
        assert_eq!(rx.iter().count(), 3);
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let rx = spawn_detection_source(JsonLinesSource::new(Cursor::new(b"{}\n{}".to_vec())));
        assert_eq!(rx.iter().count(), 2);
    }

    #[test]
    fn boxed_source_runs() {
        let src: Box<dyn DetectionSource> =
            Box::new(JsonLinesSource::new(Cursor::new(b"{}\n".to_vec())));
        let rx = spawn_detection_source(src);
        assert_eq!(rx.iter().count(), 1);
    }

    // ── CommandSource ────────────────────────────────────────────────────
    #[cfg(unix)]
    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[cfg(unix)]
    #[test]
    fn command_source_reads_child_stdout() {
        let src = CommandSource::spawn("sh", &sh(r#"echo READY; echo '{"hands":[]}'; echo '{}'"#), true)
            .unwrap();
        let rx = spawn_detection_source(src);
        assert_eq!(rx.iter().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn command_source_requires_ready_line() {
        let err = CommandSource::spawn("sh", &sh("echo LOADING"), true).err().unwrap();
        assert!(err.to_string().contains("did not signal ready"));
    }

    #[cfg(unix)]
    #[test]
    fn dropping_bridge_guard_stops_a_blocked_source() {
        let src = CommandSource::spawn("sh", &sh("echo '{}'; exec sleep 30"), false).unwrap();
        let guard = src.bridge_guard().unwrap();
        let watch = guard.clone();
        let rx = spawn_detection_source(src);

        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        assert!(watch.is_running());

        // The source thread is now blocked on the bridge's stdout.
        drop(guard);
        assert!(!watch.is_running());
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
    }

    #[test]
    fn non_command_sources_have_no_guard() {
        assert!(SimSource::new(30.0).bridge_guard().is_none());
        let boxed: Box<dyn DetectionSource> = Box::new(JsonLinesSource::new(Cursor::new(Vec::new())));
        assert!(boxed.bridge_guard().is_none());
    }

    #[test]
    fn missing_program_is_reported() {
        assert!(CommandSource::spawn("/nonexistent/model-bridge", &[], false).is_err());
    }

    // ── SimSource ────────────────────────────────────────────────────────
    #[test]
    fn sim_script_phases() {
        let idle = process_frame(&sim_frame(0)).unwrap();
        assert_eq!(idle.hand_count(), 0);

        let palm = process_frame(&sim_frame(SIM_PHASE_FRAMES)).unwrap();
        assert_eq!(palm.gesture, GestureId::OpenPalm);

        let finger = process_frame(&sim_frame(2 * SIM_PHASE_FRAMES + 5)).unwrap();
        assert_eq!(finger.gesture, GestureId::MiddleFinger);

        let two = process_frame(&sim_frame(3 * SIM_PHASE_FRAMES)).unwrap();
        assert_eq!(two.hand_count(), 2);
        assert_eq!(two.gesture, GestureId::Fist);
    }

    #[test]
    fn sim_coordinates_stay_normalized() {
        for i in 0..4 * SIM_PHASE_FRAMES {
            for hand in sim_frame(i).hands {
                for p in hand.landmarks {
                    assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y), "frame {}", i);
                }
            }
        }
    }

    #[test]
    fn sim_period_uses_configured_rate() {
        assert_eq!(sim_period(0.5), Some(Duration::from_secs(2)));
        assert_eq!(sim_period(4.0), Some(Duration::from_millis(250)));
        assert_eq!(sim_period(0.0), None);
        assert_eq!(sim_period(f64::NAN), None);
    }

    #[test]
    fn sim_source_respects_frame_limit() {
        let rx = spawn_detection_source(SimSource { fps: 1000.0, frames: Some(5) });
        assert_eq!(rx.iter().count(), 5);
    }
}
