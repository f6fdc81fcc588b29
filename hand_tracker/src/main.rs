//! hand_tracker: detection frames in, position/gesture datagrams out.

use anyhow::Result;

use hand_tracker::app::{build_sink, build_source, run};
use hand_tracker::config::{parse_args, Invocation, TrackerConfig, USAGE};

fn main() {
    hand_tracker::init_logger();

    let cfg = match parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Run(cfg)) => cfg,
        Ok(Invocation::Help)     => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    log::info!(
        "hand_tracker: target {} · {:?} wire format · max {} hand(s)",
        cfg.target, cfg.wire_format, cfg.max_hands
    );

    if let Err(e) = start(&cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn start(cfg: &TrackerConfig) -> Result<()> {
    let source = build_source(cfg)?;
    let sink   = build_sink(cfg)?;
    run(cfg, source, sink)?;
    Ok(())
}
