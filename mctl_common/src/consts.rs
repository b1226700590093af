//! System-wide constants for the motion controller.
//!
//! Single source of truth for numeric limits and protocol defaults.

use static_assertions::const_assert;

/// Number of axis slots in the register bank.
pub const AXIS_COUNT: usize = 4;

/// Transport read timeout installed by the command reader, in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 50;

/// Receive FIFO capacity of the in-memory transport, in bytes.
pub const DEFAULT_RX_BUFFER_SIZE: usize = 64;

const_assert!(AXIS_COUNT > 0);
const_assert!(AXIS_COUNT <= u8::MAX as usize);
const_assert!(DEFAULT_RX_BUFFER_SIZE > 0);
