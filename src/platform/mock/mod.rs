//! Mock platform implementation for testing
//!
//! This module provides mock implementations of the platform traits that can
//! be used for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

mod delay;
mod gpio;
mod timer;
mod twi;

pub use delay::MockDelay;
pub use gpio::MockGpio;
pub use timer::MockTickTimer;
pub use twi::{MockTwiPort, TwiEvent};
