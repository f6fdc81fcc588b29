//! Tracker configuration: optional TOML file plus command-line overrides.
//!
//! ```toml
//! target            = "127.0.0.1:5005"
//! max_hands         = 2
//! min_gesture_score = 0.5
//! wire_format       = "canonical"   # or "legacy"
//!
//! [source]
//! kind       = "command"
//! program    = "python"
//! args       = ["hand_bridge.py"]
//! wait_ready = true
//! ```

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use hand_signal::{
    ClassifierThresholds, PipelineConfig, ResolverConfig, WireFormat, SLOT_COUNT,
};

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Receiver endpoint.
    #[serde(default = "default_target")]
    pub target: String,
    /// Local address for the sending socket.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_hands")]
    pub max_hands: usize,
    #[serde(default = "default_min_gesture_score")]
    pub min_gesture_score: f64,
    #[serde(default = "default_extension_ratio")]
    pub extension_ratio: f64,
    #[serde(default = "default_curl_ratio")]
    pub curl_ratio: f64,
    #[serde(default)]
    pub wire_format: WireFormat,
    /// Stop after this many frames.
    #[serde(default)]
    pub max_frames: Option<u64>,
    /// Encode but do not send.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_target() -> String { "127.0.0.1:5005".to_string() }
fn default_bind() -> String { "0.0.0.0:0".to_string() }
fn default_max_hands() -> usize { SLOT_COUNT }
fn default_min_gesture_score() -> f64 { 0.5 }
fn default_extension_ratio() -> f64 { 1.5 }
fn default_curl_ratio() -> f64 { 0.7 }
fn default_fps() -> f64 { 30.0 }

/// Where detection frames come from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// JSON lines on standard input.
    #[default]
    Stdin,
    /// JSON lines from a spawned model bridge.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        wait_ready: bool,
    },
    /// Built-in synthetic frames.
    Sim {
        #[serde(default = "default_fps")]
        fps: f64,
    },
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            target:            default_target(),
            bind:              default_bind(),
            max_hands:         default_max_hands(),
            min_gesture_score: default_min_gesture_score(),
            extension_ratio:   default_extension_ratio(),
            curl_ratio:        default_curl_ratio(),
            wire_format:       WireFormat::default(),
            max_frames:        None,
            dry_run:           false,
            source:            SourceConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid tracker config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=SLOT_COUNT).contains(&self.max_hands),
            "max_hands must be 1 or 2, got {}", self.max_hands
        );
        ensure!(
            (0.0..=1.0).contains(&self.min_gesture_score),
            "min_gesture_score must be in [0, 1], got {}", self.min_gesture_score
        );
        ensure!(self.extension_ratio > 0.0, "extension_ratio must be positive");
        ensure!(self.curl_ratio > 0.0, "curl_ratio must be positive");
        if let SourceConfig::Sim { fps } = self.source {
            ensure!(fps > 0.0 && fps.is_finite(), "sim fps must be positive, got {}", fps);
        }
        self.target_addr()?;
        self.bind_addr()?;
        Ok(())
    }

    pub fn target_addr(&self) -> Result<SocketAddr> {
        self.target
            .parse()
            .with_context(|| format!("target {:?} is not a socket address", self.target))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("bind {:?} is not a socket address", self.bind))
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_hands: self.max_hands,
            resolver:  ResolverConfig {
                min_score:  self.min_gesture_score,
                thresholds: ClassifierThresholds {
                    extension_ratio: self.extension_ratio,
                    curl_ratio:      self.curl_ratio,
                },
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Command line
// ════════════════════════════════════════════════════════════════════════════

pub const USAGE: &str = "\
usage: hand_tracker [options]

  --config <path>   read settings from a TOML file
  --sim             use synthetic frames instead of stdin
  --legacy          send the two-token \"x y\" message
  --target <addr>   receiver address (default 127.0.0.1:5005)
  --frames <n>      stop after n frames
  --dry-run         encode and log, send nothing
  --help            show this text";

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Invocation {
    Run(TrackerConfig),
    Help,
}

/// Build a config from `args` (program name excluded).  `--config` is read
/// first; every other flag overrides the file.
pub fn parse_args<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Invocation::Help);
    }

    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).context("--config needs a path")?;
            TrackerConfig::load(Path::new(path))?
        }
        None => TrackerConfig::default(),
    };

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => { it.next(); }
            "--sim"    => {
                if !matches!(cfg.source, SourceConfig::Sim { .. }) {
                    cfg.source = SourceConfig::Sim { fps: default_fps() };
                }
            }
            "--legacy"  => cfg.wire_format = WireFormat::Legacy,
            "--dry-run" => cfg.dry_run = true,
            "--target"  => {
                cfg.target = it.next().context("--target needs an address")?.clone();
            }
            "--frames"  => {
                let n = it.next().context("--frames needs a count")?;
                cfg.max_frames = Some(
                    n.parse().with_context(|| format!("--frames: {:?} is not a count", n))?,
                );
            }
            other => bail!("unknown argument {:?}\n\n{}", other, USAGE),
        }
    }

    cfg.validate()?;
    Ok(Invocation::Run(cfg))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
