//! Transport sinks: where encoded signal lines go.
//!
//! Delivery is fire-and-forget.  A failed send is reported to the caller,
//! which logs it and moves on to the next frame; nothing is retried.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use anyhow::{Context, Result};

/// Anything that can carry one encoded message per frame.
pub trait TransportSink {
    fn send(&mut self, msg: &str) -> io::Result<()>;
}

impl<T: TransportSink + ?Sized> TransportSink for Box<T> {
    fn send(&mut self, msg: &str) -> io::Result<()> {
        (**self).send(msg)
    }
}

// ── UDP backend ───────────────────────────────────────────────────────────

/// Sends each message as a single datagram to a fixed target.
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Bind a local socket at `bind` (port 0 for ephemeral) aimed at `target`.
    pub fn connect(bind: SocketAddr, target: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(bind)
            .with_context(|| format!("failed to bind UDP socket on {}", bind))?;
        log::info!("sending to udp://{} from {}", target, socket.local_addr()?);
        Ok(UdpSink { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl TransportSink for UdpSink {
    fn send(&mut self, msg: &str) -> io::Result<()> {
        self.socket.send_to(msg.as_bytes(), self.target).map(|_| ())
    }
}

// ── null backend (dry runs) ───────────────────────────────────────────────

pub struct NullSink;

impl TransportSink for NullSink {
    fn send(&mut self, _msg: &str) -> io::Result<()> { Ok(()) }
}

// ── memory backend (tests, embedding) ─────────────────────────────────────

/// Records every message in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub sent: Vec<String>,
}

impl TransportSink for MemorySink {
    fn send(&mut self, msg: &str) -> io::Result<()> {
        self.sent.push(msg.to_string());
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
