//! In-memory transport for host tests and simulation.
//!
//! Behaves like a UART driver with a fixed receive ring buffer:
//! - bytes fed while the FIFO is full are dropped and counted as overruns
//! - reads on an empty FIFO return `None` at once, standing in for an
//!   elapsed timeout
//! - everything written is captured for inspection

use crate::transport::ByteTransport;
use heapless::Deque;
use mctl_common::consts::DEFAULT_RX_BUFFER_SIZE;
use std::time::Duration;

/// Read timeout a transport starts with before `begin()` reconfigures it.
pub const POWER_ON_TIMEOUT: Duration = Duration::from_millis(1000);

/// Fake serial port with an `N`-byte receive FIFO.
#[derive(Debug)]
pub struct MemoryTransport<const N: usize = DEFAULT_RX_BUFFER_SIZE> {
    rx: Deque<u8, N>,
    tx: Vec<u8>,
    timeout: Duration,
    overruns: usize,
}

impl MemoryTransport {
    /// Transport with the default FIFO size.
    pub const fn new() -> Self {
        Self::empty()
    }
}

impl<const N: usize> MemoryTransport<N> {
    /// Transport with an `N`-byte FIFO, nothing buffered.
    pub const fn empty() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            timeout: POWER_ON_TIMEOUT,
            overruns: 0,
        }
    }

    /// Push received bytes into the FIFO.
    ///
    /// Returns how many were accepted. The rest are dropped.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if self.rx.push_back(byte).is_err() {
                self.overruns += bytes.len() - accepted;
                tracing::warn!(
                    "RX FIFO full ({} bytes), dropped {} bytes",
                    N,
                    bytes.len() - accepted
                );
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Push received text into the FIFO.
    pub fn feed_str(&mut self, text: &str) -> usize {
        self.feed(text.as_bytes())
    }

    /// FIFO capacity in bytes.
    pub const fn rx_capacity(&self) -> usize {
        N
    }

    /// Total bytes dropped because the FIFO was full.
    pub const fn overrun_count(&self) -> usize {
        self.overruns
    }

    /// Discard everything still buffered on the receive side.
    pub fn clear_input(&mut self) {
        self.rx.clear();
    }

    /// Everything written so far, without clearing it.
    pub fn output(&self) -> &[u8] {
        &self.tx
    }

    /// Everything written so far as text.
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }

    /// Take everything written so far, leaving the output empty.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl<const N: usize> Default for MemoryTransport<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> ByteTransport for MemoryTransport<N> {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn peek(&mut self) -> Option<u8> {
        self.rx.front().copied()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transport_is_idle() {
        let t = MemoryTransport::new();
        assert_eq!(t.available(), 0);
        assert_eq!(t.rx_capacity(), DEFAULT_RX_BUFFER_SIZE);
        assert_eq!(t.timeout(), POWER_ON_TIMEOUT);
        assert!(t.output().is_empty());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut t = MemoryTransport::new();
        t.feed(b"ab");
        assert_eq!(t.peek(), Some(b'a'));
        assert_eq!(t.peek(), Some(b'a'));
        assert_eq!(t.read_byte(), Some(b'a'));
        assert_eq!(t.read_byte(), Some(b'b'));
        assert_eq!(t.read_byte(), None);
        assert_eq!(t.peek(), None);
    }

    #[test]
    fn full_fifo_drops_and_counts_overrun() {
        let mut t = MemoryTransport::<4>::empty();
        assert_eq!(t.feed(b"HOME\n"), 4);
        assert_eq!(t.overrun_count(), 1);
        assert_eq!(t.available(), 4);

        t.read_byte();
        assert_eq!(t.feed(b"\n"), 1);
        assert_eq!(t.overrun_count(), 1);
    }

    #[test]
    fn take_output_drains_written_bytes() {
        let mut t = MemoryTransport::new();
        t.write_bytes(b"OK");
        assert_eq!(t.output_str(), "OK");
        assert_eq!(t.take_output(), b"OK");
        assert!(t.output().is_empty());
    }

    #[test]
    fn clear_input_empties_fifo() {
        let mut t = MemoryTransport::new();
        t.feed_str("MOVE 1\n");
        t.clear_input();
        assert_eq!(t.available(), 0);
    }
}
