//! Per-axis register bank shared between the command loop and interrupt context.
//!
//! Each axis slot holds three independent atomic cells:
//!
//! | Field       | Type  | Meaning                                          |
//! |-------------|-------|--------------------------------------------------|
//! | `enable`    | bool  | Axis driver energized                            |
//! | `interrupt` | bool  | Pending interrupt / request flag                 |
//! | `steps`     | i32   | Step counter or target, sign encodes direction   |
//!
//! ## Concurrency Contract
//!
//! - Every single-field load, store and read-modify-write is atomic and
//!   torn-free. Nothing locks, nothing blocks.
//! - There is NO atomicity across fields or axes. Readers must not assume
//!   `enable` and `steps` of one axis were updated together.
//! - Loads are `Acquire`, stores are `Release`, RMW operations are `AcqRel`.
//!   A context that writes `steps` and then raises `interrupt` publishes that
//!   `steps` value to whoever observes the raised flag. No other cross-field
//!   ordering exists.
//!
//! ## Sharing
//!
//! The bank is never a hidden global. Create it once at startup and hand it
//! to every consumer explicitly, as `Arc<AxisRegisterBank>` or, on targets
//! without an allocator, as a `&'static AxisRegisterBank` built with the
//! `const` constructor.

use crate::consts::AXIS_COUNT;
use serde::{Deserialize, Serialize};
use static_assertions::{assert_impl_all, const_assert_eq};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use thiserror::Error;

/// Errors raised at the register bank boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// Axis index outside `0..count`.
    #[error("Axis index {axis} out of range (bank has {count} axes)")]
    AxisOutOfRange {
        /// Rejected index.
        axis: usize,
        /// Number of axes in the bank.
        count: usize,
    },
}

/// Field-by-field copy of one axis slot.
///
/// The three values are loaded one after another; they are not a consistent
/// snapshot if another context is writing concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisSnapshot {
    /// Driver energized.
    pub enable: bool,
    /// Pending interrupt flag.
    pub interrupt: bool,
    /// Step counter / target.
    pub steps: i32,
}

/// One axis slot. Cache-line aligned so neighbouring axes never share a line.
#[derive(Debug, Default)]
#[repr(C, align(64))]
pub struct AxisRegisters {
    enable: AtomicBool,
    interrupt: AtomicBool,
    steps: AtomicI32,
}

const_assert_eq!(core::mem::align_of::<AxisRegisters>(), 64);
assert_impl_all!(AxisRegisters: Send, Sync);

impl AxisRegisters {
    /// Create a slot in the power-on state (disabled, no interrupt, zero steps).
    pub const fn new() -> Self {
        Self {
            enable: AtomicBool::new(false),
            interrupt: AtomicBool::new(false),
            steps: AtomicI32::new(0),
        }
    }

    /// Whether the axis driver is energized.
    #[inline]
    pub fn enable(&self) -> bool {
        self.enable.load(Ordering::Acquire)
    }

    /// Energize or release the axis driver.
    #[inline]
    pub fn set_enable(&self, value: bool) {
        self.enable.store(value, Ordering::Release);
    }

    /// Pending interrupt flag.
    #[inline]
    pub fn interrupt(&self) -> bool {
        self.interrupt.load(Ordering::Acquire)
    }

    /// Raise or clear the interrupt flag.
    #[inline]
    pub fn set_interrupt(&self, value: bool) {
        self.interrupt.store(value, Ordering::Release);
    }

    /// Clear the interrupt flag, returning whether it was set.
    ///
    /// Exactly one of several concurrent callers observes `true` for a
    /// single raise.
    #[inline]
    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::AcqRel)
    }

    /// Current step value.
    #[inline]
    pub fn steps(&self) -> i32 {
        self.steps.load(Ordering::Acquire)
    }

    /// Overwrite the step value.
    #[inline]
    pub fn set_steps(&self, value: i32) {
        self.steps.store(value, Ordering::Release);
    }

    /// Add `delta` (wrapping on overflow) and return the previous value.
    #[inline]
    pub fn add_steps(&self, delta: i32) -> i32 {
        self.steps.fetch_add(delta, Ordering::AcqRel)
    }

    /// Store `new` only if the step value still equals `current`.
    ///
    /// Returns `Ok(previous)` on success and `Err(actual)` otherwise.
    #[inline]
    pub fn compare_exchange_steps(&self, current: i32, new: i32) -> Result<i32, i32> {
        self.steps
            .compare_exchange(current, new, Ordering::AcqRel, Ordering::Acquire)
    }

    /// Move the step value one step closer to zero.
    ///
    /// Returns the value before the step, or `None` if it was already zero.
    /// The sign of the returned value tells the caller which direction to pulse.
    pub fn step_towards_zero(&self) -> Option<i32> {
        self.steps
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |steps| {
                match steps.cmp(&0) {
                    core::cmp::Ordering::Greater => Some(steps - 1),
                    core::cmp::Ordering::Less => Some(steps + 1),
                    core::cmp::Ordering::Equal => None,
                }
            })
            .ok()
    }

    /// Load all three fields, one at a time.
    pub fn snapshot(&self) -> AxisSnapshot {
        AxisSnapshot {
            enable: self.enable(),
            interrupt: self.interrupt(),
            steps: self.steps(),
        }
    }

    /// Return the slot to its power-on state, one field at a time.
    pub fn reset(&self) {
        self.set_enable(false);
        self.set_interrupt(false);
        self.set_steps(0);
    }
}

/// Fixed bank of [`AXIS_COUNT`] independently atomic axis slots.
#[derive(Debug, Default)]
pub struct AxisRegisterBank {
    axes: [AxisRegisters; AXIS_COUNT],
}

assert_impl_all!(AxisRegisterBank: Send, Sync);

impl AxisRegisterBank {
    /// Create a bank with every axis in the power-on state.
    pub const fn new() -> Self {
        Self {
            axes: [const { AxisRegisters::new() }; AXIS_COUNT],
        }
    }

    /// Number of axes in the bank.
    #[inline]
    pub const fn len(&self) -> usize {
        AXIS_COUNT
    }

    /// Always `false`; the bank has a fixed, non-zero size.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Borrow one axis slot.
    ///
    /// # Errors
    ///
    /// `RegisterError::AxisOutOfRange` if `axis >= AXIS_COUNT`.
    #[inline]
    pub fn axis(&self, axis: usize) -> Result<&AxisRegisters, RegisterError> {
        self.axes.get(axis).ok_or(RegisterError::AxisOutOfRange {
            axis,
            count: AXIS_COUNT,
        })
    }

    /// Iterate `(index, slot)` over every axis.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AxisRegisters)> {
        self.axes.iter().enumerate()
    }

    /// Read `enable` of `axis`.
    pub fn get_enable(&self, axis: usize) -> Result<bool, RegisterError> {
        Ok(self.axis(axis)?.enable())
    }

    /// Write `enable` of `axis`.
    pub fn set_enable(&self, axis: usize, value: bool) -> Result<(), RegisterError> {
        self.axis(axis)?.set_enable(value);
        Ok(())
    }

    /// Read `interrupt` of `axis`.
    pub fn get_interrupt(&self, axis: usize) -> Result<bool, RegisterError> {
        Ok(self.axis(axis)?.interrupt())
    }

    /// Write `interrupt` of `axis`.
    pub fn set_interrupt(&self, axis: usize, value: bool) -> Result<(), RegisterError> {
        self.axis(axis)?.set_interrupt(value);
        Ok(())
    }

    /// Read `steps` of `axis`.
    pub fn get_steps(&self, axis: usize) -> Result<i32, RegisterError> {
        Ok(self.axis(axis)?.steps())
    }

    /// Write `steps` of `axis`.
    pub fn set_steps(&self, axis: usize, value: i32) -> Result<(), RegisterError> {
        self.axis(axis)?.set_steps(value);
        Ok(())
    }

    /// Atomically add to `steps` of `axis`, returning the previous value.
    pub fn add_steps(&self, axis: usize, delta: i32) -> Result<i32, RegisterError> {
        Ok(self.axis(axis)?.add_steps(delta))
    }

    /// Compare-and-swap on `steps` of `axis`.
    ///
    /// The outer `Result` is the boundary check; the inner one is the CAS
    /// outcome as returned by [`AxisRegisters::compare_exchange_steps`].
    pub fn compare_exchange_steps(
        &self,
        axis: usize,
        current: i32,
        new: i32,
    ) -> Result<Result<i32, i32>, RegisterError> {
        Ok(self.axis(axis)?.compare_exchange_steps(current, new))
    }

    /// Field-by-field copy of every axis.
    pub fn snapshot_all(&self) -> [AxisSnapshot; AXIS_COUNT] {
        core::array::from_fn(|i| self.axes[i].snapshot())
    }

    /// Return every axis to its power-on state.
    pub fn reset_all(&self) {
        for axis in &self.axes {
            axis.reset();
        }
        tracing::debug!("Register bank reset ({} axes)", AXIS_COUNT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bank_is_in_power_on_state() {
        let bank = AxisRegisterBank::new();
        assert_eq!(bank.len(), AXIS_COUNT);
        for snapshot in bank.snapshot_all() {
            assert_eq!(snapshot, AxisSnapshot::default());
        }
    }

    #[test]
    fn const_bank_can_live_in_a_static() {
        static BANK: AxisRegisterBank = AxisRegisterBank::new();
        BANK.set_steps(3, -7).unwrap();
        assert_eq!(BANK.get_steps(3).unwrap(), -7);
    }

    #[test]
    fn out_of_range_axis_is_rejected() {
        let bank = AxisRegisterBank::new();
        let expected = RegisterError::AxisOutOfRange {
            axis: AXIS_COUNT,
            count: AXIS_COUNT,
        };

        assert_eq!(bank.get_enable(AXIS_COUNT), Err(expected));
        assert_eq!(bank.set_enable(AXIS_COUNT, true), Err(expected));
        assert_eq!(bank.get_interrupt(AXIS_COUNT), Err(expected));
        assert_eq!(bank.set_interrupt(AXIS_COUNT, true), Err(expected));
        assert_eq!(bank.get_steps(AXIS_COUNT), Err(expected));
        assert_eq!(bank.set_steps(AXIS_COUNT, 1), Err(expected));
        assert_eq!(bank.add_steps(AXIS_COUNT, 1), Err(expected));
        assert_eq!(bank.compare_exchange_steps(AXIS_COUNT, 0, 1), Err(expected));
        assert!(bank.axis(usize::MAX).is_err());

        // Axis 0 must not have been touched through aliasing.
        assert_eq!(bank.axis(0).unwrap().snapshot(), AxisSnapshot::default());
    }

    #[test]
    fn error_message_names_index_and_count() {
        let err = RegisterError::AxisOutOfRange { axis: 4, count: 4 };
        assert_eq!(err.to_string(), "Axis index 4 out of range (bank has 4 axes)");
    }

    #[test]
    fn fields_are_independent() {
        let bank = AxisRegisterBank::new();
        bank.set_enable(2, true).unwrap();

        for axis in 0..AXIS_COUNT {
            bank.set_steps(axis, 1000).unwrap();
            bank.set_interrupt(axis, true).unwrap();
        }

        assert!(bank.get_enable(2).unwrap());
        assert!(!bank.get_enable(0).unwrap());
        assert!(!bank.get_enable(3).unwrap());
    }

    #[test]
    fn take_interrupt_consumes_flag_once() {
        let axis = AxisRegisters::new();
        assert!(!axis.take_interrupt());

        axis.set_interrupt(true);
        assert!(axis.take_interrupt());
        assert!(!axis.take_interrupt());
        assert!(!axis.interrupt());
    }

    #[test]
    fn add_steps_returns_previous_and_wraps() {
        let axis = AxisRegisters::new();
        assert_eq!(axis.add_steps(5), 0);
        assert_eq!(axis.add_steps(-8), 5);
        assert_eq!(axis.steps(), -3);

        axis.set_steps(i32::MAX);
        axis.add_steps(1);
        assert_eq!(axis.steps(), i32::MIN);
    }

    #[test]
    fn compare_exchange_reports_actual_value_on_mismatch() {
        let bank = AxisRegisterBank::new();
        bank.set_steps(1, 10).unwrap();

        assert_eq!(bank.compare_exchange_steps(1, 10, 20).unwrap(), Ok(10));
        assert_eq!(bank.compare_exchange_steps(1, 10, 30).unwrap(), Err(20));
        assert_eq!(bank.get_steps(1).unwrap(), 20);
    }

    #[test]
    fn step_towards_zero_follows_sign() {
        let axis = AxisRegisters::new();
        assert_eq!(axis.step_towards_zero(), None);

        axis.set_steps(2);
        assert_eq!(axis.step_towards_zero(), Some(2));
        assert_eq!(axis.step_towards_zero(), Some(1));
        assert_eq!(axis.step_towards_zero(), None);

        axis.set_steps(-2);
        assert_eq!(axis.step_towards_zero(), Some(-2));
        assert_eq!(axis.steps(), -1);
    }

    #[test]
    fn reset_all_clears_every_field() {
        let bank = AxisRegisterBank::new();
        for (index, axis) in bank.iter() {
            axis.set_enable(true);
            axis.set_interrupt(true);
            axis.set_steps(index as i32 + 1);
        }

        bank.reset_all();
        assert!(bank
            .snapshot_all()
            .iter()
            .all(|s| *s == AxisSnapshot::default()));
    }
}
