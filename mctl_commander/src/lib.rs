//! # Motion Controller Command Protocol
//!
//! Reads line-oriented ASCII commands from a byte-stream transport and writes
//! response lines back.
//!
//! ```text
//! <ACTION> <int> <int> ... <int>\n
//! ```
//!
//! # Module Structure
//!
//! - [`transport`] - `ByteTransport` capability trait and stream primitives
//! - [`memory`] - In-memory transport for host tests and simulation
//! - [`command`] - Parsed `Command` value
//! - [`reader`] - `CommandReader`, the parse protocol
//! - [`config`] - Reader configuration
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  bytes  ┌──────────────────┐ Command ┌──────────────┐
//! │ ByteTransport├────────►│  CommandReader   ├────────►│ dispatch     │
//! │ (UART / mem) │◄────────┤  (parse / reply) │◄────────┤ (caller)     │
//! └──────────────┘  lines  └──────────────────┘  reply  └──────┬───────┘
//!                                                              │
//!                                                     ┌────────▼────────┐
//!                                                     │AxisRegisterBank │
//!                                                     │ (mctl_common)   │
//!                                                     └─────────────────┘
//! ```

#![deny(missing_docs)]

pub mod command;
pub mod config;
pub mod memory;
pub mod reader;
pub mod transport;

pub use crate::command::Command;
pub use crate::config::{MalformedTokenPolicy, ReaderConfig};
pub use crate::memory::MemoryTransport;
pub use crate::reader::CommandReader;
pub use crate::transport::{ByteTransport, Lookahead};
