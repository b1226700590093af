//! Command reader configuration.
//!
//! Embeds in a controller TOML file as a `[reader]` table:
//!
//! ```toml
//! [shared]
//! service_name = "mctl-01"
//!
//! [reader]
//! read_timeout_ms = 50
//! malformed_token = "zero"
//! ```

use mctl_common::consts::DEFAULT_READ_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a non-numeric token in parameter position turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedTokenPolicy {
    /// Append `0` in its place.
    #[default]
    Zero,
    /// Drop it; the parameter list gets no entry.
    Skip,
}

/// Settings applied by [`CommandReader`](crate::reader::CommandReader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Per-primitive transport read timeout [ms].
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Handling of malformed parameter tokens.
    #[serde(default)]
    pub malformed_token: MalformedTokenPolicy,
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

impl ReaderConfig {
    /// Read timeout as a `Duration`.
    #[inline]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            malformed_token: MalformedTokenPolicy::default(),
        }
    }
}
