//! Byte-stream transport capability.
//!
//! The command reader never talks to hardware directly. It drives any type
//! implementing [`ByteTransport`]: a UART driver on target, or
//! [`MemoryTransport`](crate::memory::MemoryTransport) on the host.
//!
//! Implementors provide the five hardware primitives. The stream helpers
//! (`read_until`, `parse_int`, `write_line`) are default methods built on
//! top of them, so every transport parses numbers the same way.
//!
//! # Timeout Contract
//!
//! | Primitive    | Blocks for at most      | On timeout        |
//! |--------------|-------------------------|-------------------|
//! | `available`  | never                   | -                 |
//! | `peek`       | the configured timeout  | `None`            |
//! | `read_byte`  | the configured timeout  | `None`            |
//! | `write_bytes`| transport-defined       | -                 |
//!
//! The timeout applies to each primitive call, not to a whole command.

use std::time::Duration;

/// Leading-byte policy for [`ByteTransport::parse_int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookahead {
    /// The integer must start at the current byte.
    #[default]
    SkipNone,
    /// Skip ASCII whitespace before the integer.
    SkipWhitespace,
    /// Skip every byte that cannot start an integer.
    SkipAll,
}

/// A single-owner, timeout-bounded byte stream.
///
/// All methods take `&mut self`; one context reads and writes at a time.
pub trait ByteTransport {
    /// Number of bytes buffered and readable without blocking.
    fn available(&self) -> usize;

    /// Next byte without consuming it, or `None` if none arrives in time.
    fn peek(&mut self) -> Option<u8>;

    /// Consume one byte, or `None` if none arrives in time.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write raw bytes.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Set the per-primitive read timeout.
    fn set_timeout(&mut self, timeout: Duration);

    /// Currently configured read timeout.
    fn timeout(&self) -> Duration;

    /// Consume bytes up to and including `delimiter`.
    ///
    /// The delimiter is not part of the result. A timeout ends the read early
    /// and returns whatever was accumulated.
    fn read_until(&mut self, delimiter: u8) -> Vec<u8> {
        let mut bytes = Vec::new();
        while let Some(byte) = self.read_byte() {
            if byte == delimiter {
                break;
            }
            bytes.push(byte);
        }
        bytes
    }

    /// Parse a signed decimal integer at the current position.
    ///
    /// Consumes an optional `-` and every following digit. Returns `None`
    /// when no digit was consumed; in [`Lookahead::SkipNone`] mode nothing is
    /// consumed unless the current byte is a digit or `-`. Values outside the
    /// `i32` range saturate.
    fn parse_int(&mut self, mode: Lookahead) -> Option<i32> {
        loop {
            let byte = self.peek()?;
            if byte == b'-' || byte.is_ascii_digit() {
                break;
            }
            match mode {
                Lookahead::SkipNone => return None,
                Lookahead::SkipWhitespace if !byte.is_ascii_whitespace() => return None,
                Lookahead::SkipWhitespace | Lookahead::SkipAll => {
                    self.read_byte();
                }
            }
        }

        let negative = self.peek() == Some(b'-');
        if negative {
            self.read_byte();
        }

        let mut magnitude: i64 = 0;
        let mut digits = 0usize;
        while let Some(byte) = self.peek() {
            if !byte.is_ascii_digit() {
                break;
            }
            self.read_byte();
            magnitude = magnitude
                .saturating_mul(10)
                .saturating_add(i64::from(byte - b'0'));
            digits += 1;
        }

        if digits == 0 {
            return None;
        }

        let value = if negative { -magnitude } else { magnitude };
        Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }

    /// Write `text` followed by a single `'\n'`.
    fn write_line(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
        self.write_bytes(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;

    fn stream(text: &str) -> MemoryTransport {
        let mut transport = MemoryTransport::new();
        transport.feed_str(text);
        transport
    }

    #[test]
    fn read_until_consumes_delimiter() {
        let mut t = stream("MOVE 1");
        assert_eq!(t.read_until(b' '), b"MOVE");
        assert_eq!(t.peek(), Some(b'1'));
    }

    #[test]
    fn read_until_returns_partial_on_timeout() {
        let mut t = stream("HOM");
        assert_eq!(t.read_until(b' '), b"HOM");
        assert_eq!(t.available(), 0);
    }

    #[test]
    fn parse_int_reads_signed_values() {
        let mut t = stream("-42 17");
        assert_eq!(t.parse_int(Lookahead::SkipNone), Some(-42));
        assert_eq!(t.peek(), Some(b' '));
        assert_eq!(t.parse_int(Lookahead::SkipWhitespace), Some(17));
    }

    #[test]
    fn strict_parse_consumes_nothing_on_non_digit() {
        let mut t = stream(" 5");
        assert_eq!(t.parse_int(Lookahead::SkipNone), None);
        assert_eq!(t.available(), 2);

        let mut t = stream("x5");
        assert_eq!(t.parse_int(Lookahead::SkipWhitespace), None);
        assert_eq!(t.peek(), Some(b'x'));
        assert_eq!(t.parse_int(Lookahead::SkipAll), Some(5));
    }

    #[test]
    fn lone_minus_is_consumed_without_value() {
        let mut t = stream("-x");
        assert_eq!(t.parse_int(Lookahead::SkipNone), None);
        assert_eq!(t.peek(), Some(b'x'));
    }

    #[test]
    fn parse_int_handles_i32_extremes_and_saturates() {
        let mut t = stream("-2147483648 2147483647 99999999999999999999999");
        assert_eq!(t.parse_int(Lookahead::SkipNone), Some(i32::MIN));
        assert_eq!(t.parse_int(Lookahead::SkipWhitespace), Some(i32::MAX));
        assert_eq!(t.parse_int(Lookahead::SkipWhitespace), Some(i32::MAX));
        assert_eq!(t.available(), 0);
    }

    #[test]
    fn parse_int_on_empty_stream_times_out() {
        let mut t = MemoryTransport::new();
        assert_eq!(t.parse_int(Lookahead::SkipAll), None);
    }

    #[test]
    fn write_line_appends_single_newline() {
        let mut t = MemoryTransport::new();
        t.write_line("OK");
        assert_eq!(t.take_output(), b"OK\n");
    }
}
