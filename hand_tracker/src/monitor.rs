//! Receiving side of the channel.
//!
//! Datagrams may be lost or arrive malformed.  [`SignalMonitor`] keeps the
//! last good signal so a consumer always has a current state to read.

use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Duration;

use anyhow::{Context, Result};

use hand_signal::{DecodedSignal, FrameSignal, MessageForm, WireError};

/// Socket read timeout; a quiet tracker is not an error.
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Last-known state of the remote tracker.
#[derive(Debug, Default)]
pub struct SignalMonitor {
    current:   FrameSignal,
    received:  u64,
    malformed: u64,
}

impl SignalMonitor {
    pub fn new() -> Self { Self::default() }

    /// Decode `msg` and make it current.  On error the previous state is
    /// kept.
    pub fn apply(&mut self, msg: &str) -> Result<&FrameSignal, WireError> {
        match DecodedSignal::parse(msg) {
            Ok(decoded) => {
                if decoded.form == MessageForm::Legacy {
                    log::debug!("legacy message: {:?}", msg);
                }
                self.current = decoded.signal;
                self.received += 1;
                Ok(&self.current)
            }
            Err(e) => {
                self.malformed += 1;
                log::warn!("malformed message {:?}: {}", msg, e);
                Err(e)
            }
        }
    }

    pub fn current(&self) -> &FrameSignal { &self.current }
    pub fn received(&self) -> u64 { self.received }
    pub fn malformed(&self) -> u64 { self.malformed }
}

/// Receive on `socket`, feeding every datagram to `monitor`, until
/// `max_messages` datagrams have arrived (forever if `None`).
pub fn listen_on(
    socket:       &UdpSocket,
    monitor:      &mut SignalMonitor,
    max_messages: Option<u64>,
) -> Result<()> {
    socket
        .set_read_timeout(Some(READ_TIMEOUT))
        .context("failed to set read timeout")?;

    let mut buf = [0u8; 512];
    let mut count = 0u64;
    while max_messages.map_or(true, |max| count < max) {
        let (n, from) = match socket.recv_from(&mut buf) {
            Ok(r) => r,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                log::trace!("no message in {:?}", READ_TIMEOUT);
                continue;
            }
            Err(e) => return Err(e).context("receive failed"),
        };
        count += 1;

        let msg = String::from_utf8_lossy(&buf[..n]);
        if let Ok(signal) = monitor.apply(msg.trim()) {
            let [a, b] = signal.slots;
            log::info!(
                "{}: slot0 {} slot1 {} gesture {}",
                from, describe(a), describe(b), signal.gesture
            );
        }
    }
    Ok(())
}

fn describe(slot: hand_signal::HandCentroid) -> String {
    if slot.is_absent() {
        "-".to_string()
    } else {
        format!("({:.3}, {:.3})", slot.x, slot.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hand_signal::{GestureId, HandCentroid};

    #[test]
    fn starts_idle() {
        let m = SignalMonitor::new();
        assert_eq!(*m.current(), FrameSignal::IDLE);
    }

    #[test]
    fn malformed_message_keeps_last_state() {
        let mut m = SignalMonitor::new();
        m.apply("0.400000 0.600000 -1.000000 -1.000000 2").unwrap();
        assert!(m.apply("garbage").is_err());
        assert!(m.apply("").is_err());
        assert_eq!(m.current().slots[0], HandCentroid::new(0.4, 0.6));
        assert_eq!(m.current().gesture, GestureId::Victory);
        assert_eq!((m.received(), m.malformed()), (1, 2));
    }

    #[test]
    fn legacy_messages_are_accepted() {
        let mut m = SignalMonitor::new();
        m.apply("0.45 0.62").unwrap();
        assert_eq!(m.current().slots[0], HandCentroid::new(0.45, 0.62));
        m.apply("-1 -1").unwrap();
        assert_eq!(*m.current(), FrameSignal::IDLE);
    }

    #[test]
    fn listens_on_loopback() {
        let rx = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = rx.local_addr().unwrap();
        let tx = UdpSocket::bind("127.0.0.1:0").unwrap();
        tx.send_to(b"0.100000 0.200000 0.300000 0.400000 6", addr).unwrap();
        tx.send_to(b"bad", addr).unwrap();

        let mut m = SignalMonitor::new();
        listen_on(&rx, &mut m, Some(2)).unwrap();

        let s = m.current();
        assert_abs_diff_eq!(s.slots[1].x, 0.3, epsilon = 1e-9);
        assert_eq!(s.gesture, GestureId::PointingUp);
        assert_eq!((m.received(), m.malformed()), (1, 1));
    }
}
