//! Command reader: turns a byte stream into [`Command`] values.
//!
//! # Parse Protocol
//!
//! ```text
//! READING_ACTION ──► SCANNING_PARAMS ──┬─ ' ' / '\t'  → SKIP_SPACE  (consume, loop)
//!                          ▲           ├─ other byte  → PARSE_INT   (consume token, loop)
//!                          └───────────┤
//!                                      ├─ '\r' / '\n' → TERMINATE   (consume through '\n')
//!                                      └─ timeout     → TERMINATE   (params so far)
//! ```
//!
//! Every loop iteration either consumes at least one byte or terminates, so
//! malformed input can never stall the scan. Each transport primitive is
//! bounded by the configured read timeout; a whole command is not.

use crate::command::Command;
use crate::config::{MalformedTokenPolicy, ReaderConfig};
use crate::transport::{ByteTransport, Lookahead};
use tracing::{debug, trace, warn};

#[inline]
const fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

#[inline]
const fn is_terminator(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n')
}

/// Reads commands from and writes responses to a [`ByteTransport`].
///
/// Owns its transport. Not meant to be shared between contexts; serialize
/// access externally if more than one context needs it.
#[derive(Debug)]
pub struct CommandReader<T: ByteTransport> {
    transport: T,
    config: ReaderConfig,
}

impl<T: ByteTransport> CommandReader<T> {
    /// Reader with the default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ReaderConfig::default())
    }

    /// Reader with an explicit configuration.
    pub fn with_config(transport: T, config: ReaderConfig) -> Self {
        Self { transport, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Install the configured read timeout on the transport.
    ///
    /// Call once before the first read.
    pub fn begin(&mut self) {
        self.transport.set_timeout(self.config.read_timeout());
        debug!(
            "Command reader ready (read timeout {} ms, malformed tokens -> {:?})",
            self.config.read_timeout_ms, self.config.malformed_token
        );
    }

    /// `true` if at least one byte is buffered. Never blocks.
    ///
    /// Does not promise a complete line, only that the next read will not
    /// wait on an empty buffer.
    pub fn has_command(&self) -> bool {
        self.transport.available() > 0
    }

    /// Read one command line.
    ///
    /// Parse anomalies never fail the read:
    /// - a timeout before any action byte yields an empty action
    /// - a timeout before the terminator yields the parameters seen so far
    /// - a malformed parameter token is handled per [`MalformedTokenPolicy`]
    pub fn read_command(&mut self) -> Command {
        let action = self.read_action();
        let mut params = Vec::new();

        loop {
            match self.transport.peek() {
                None => {
                    debug!(
                        "Timed out before line terminator, returning {} parameter(s)",
                        params.len()
                    );
                    break;
                }
                Some(byte) if is_terminator(byte) => {
                    self.transport.read_until(b'\n');
                    break;
                }
                Some(byte) if is_separator(byte) => {
                    self.transport.read_byte();
                }
                Some(_) => self.read_param(&mut params),
            }
        }

        let command = Command { action, params };
        if command.is_empty() {
            trace!("Empty command line");
        } else {
            debug!("Command received: {}", command);
        }
        command
    }

    /// Read a command if any byte is buffered.
    ///
    /// Returns `None` when nothing is buffered or the line carried no action.
    pub fn poll(&mut self) -> Option<Command> {
        if !self.has_command() {
            return None;
        }
        let command = self.read_command();
        (!command.is_empty()).then_some(command)
    }

    /// Write `text` as one response line.
    pub fn write_response(&mut self, text: &str) {
        trace!("Response: {}", text);
        self.transport.write_line(text);
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Action token: leading separators skipped, then bytes up to and
    /// including the next separator. A line terminator also ends the token
    /// but is left for the parameter scan.
    fn read_action(&mut self) -> String {
        while let Some(byte) = self.transport.peek() {
            if !is_separator(byte) {
                break;
            }
            self.transport.read_byte();
        }

        let mut raw = Vec::new();
        while let Some(byte) = self.transport.peek() {
            if is_terminator(byte) {
                break;
            }
            self.transport.read_byte();
            if is_separator(byte) {
                break;
            }
            raw.push(byte);
        }

        let mut action = String::from_utf8_lossy(&raw).into_owned();
        action.make_ascii_uppercase();
        action
    }

    fn read_param(&mut self, params: &mut Vec<i32>) {
        match self.transport.parse_int(Lookahead::SkipNone) {
            Some(value) => {
                let trailing = self.discard_token();
                if !trailing.is_empty() {
                    warn!(
                        "Discarded {:?} trailing parameter {}",
                        String::from_utf8_lossy(&trailing),
                        value
                    );
                }
                params.push(value);
            }
            None => {
                let token = self.discard_token();
                warn!(
                    "Malformed parameter {:?} at position {} ({:?})",
                    String::from_utf8_lossy(&token),
                    params.len(),
                    self.config.malformed_token
                );
                if self.config.malformed_token == MalformedTokenPolicy::Zero {
                    params.push(0);
                }
            }
        }
    }

    /// Consume bytes up to the next separator, terminator or timeout.
    fn discard_token(&mut self) -> Vec<u8> {
        let mut token = Vec::new();
        while let Some(byte) = self.transport.peek() {
            if is_separator(byte) || is_terminator(byte) {
                break;
            }
            self.transport.read_byte();
            token.push(byte);
        }
        token
    }
}
