//! Tick timer trait
//!
//! This module defines the free-running counter interface that the monotonic
//! clock is built on.

/// Free-running 8-bit tick counter
///
/// The counter wraps from its maximum back to zero and raises an overflow
/// notification on every wrap. At the documented configuration (core clock
/// divided by 8, 16 MHz core) one tick is half a microsecond.
///
/// # Safety Invariants
///
/// - The counter must be started before timestamps are sampled
/// - The overflow notification handler must call
///   [`SysClock::on_overflow`](crate::time::SysClock::on_overflow) exactly
///   once per wrap
pub trait TickTimer {
    /// Configure free-running mode at the fixed prescale, clear any stale
    /// overflow flag, enable the overflow notification, and start counting
    fn start(&mut self);

    /// Live hardware counter value
    fn count(&self) -> u8;

    /// True while a counter overflow is pending service
    ///
    /// The flag is raised by hardware at the wrap and cleared when the
    /// overflow notification handler runs.
    fn overflow_pending(&self) -> bool;
}
