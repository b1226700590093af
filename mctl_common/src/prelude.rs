//! Prelude module for common re-exports.
//!
//! ```rust
//! use mctl_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, DEFAULT_READ_TIMEOUT_MS, DEFAULT_RX_BUFFER_SIZE};

// ─── Register Bank ──────────────────────────────────────────────────
pub use crate::registers::{AxisRegisterBank, AxisRegisters, AxisSnapshot, RegisterError};

/// Default transport read timeout as Duration.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(DEFAULT_READ_TIMEOUT_MS);
