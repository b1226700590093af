//! Motion Controller Common Library
//!
//! This crate provides the shared constants, configuration loading utilities
//! and the per-axis register bank used by every motion controller crate.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide numeric limits and defaults
//! - [`config`] - Configuration loading traits and types
//! - [`registers`] - Lock-free per-axis register bank (enable / interrupt / steps)
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use mctl_common::prelude::*;
//! use std::sync::Arc;
//!
//! let bank = Arc::new(AxisRegisterBank::new());
//! bank.set_steps(0, 200).unwrap();
//! assert_eq!(bank.get_steps(0).unwrap(), 200);
//! assert!(bank.get_steps(AXIS_COUNT).is_err());
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod registers;
