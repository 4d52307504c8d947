//! Monotonic microsecond time base
//!
//! Extends an 8-bit free-running hardware counter into a 64-bit microsecond
//! timestamp. Independent of the bus stack.

mod systime;

pub use systime::SysClock;
