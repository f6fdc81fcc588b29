//! signal_listen: bind the receiver port and log every decoded signal.
//!
//! usage: signal_listen [port]   (default 5005)

use std::net::UdpSocket;

use anyhow::{Context, Result};

use hand_tracker::monitor::{listen_on, SignalMonitor};

const DEFAULT_PORT: u16 = 5005;

fn main() {
    hand_tracker::init_logger();

    if let Err(e) = listen() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn listen() -> Result<()> {
    let port = match std::env::args().nth(1) {
        Some(p) => p.parse::<u16>().with_context(|| format!("{:?} is not a port number", p))?,
        None    => DEFAULT_PORT,
    };

    let socket = UdpSocket::bind(("0.0.0.0", port))
        .with_context(|| format!("failed to bind UDP port {}", port))?;
    log::info!("listening on udp://{}", socket.local_addr()?);

    let mut monitor = SignalMonitor::new();
    listen_on(&socket, &mut monitor, None)
}
