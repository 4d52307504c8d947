//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the TWI peripheral, the
//! free-running tick counter, and the sensor reset line. All platform-specific
//! code must be isolated to this module.

pub mod error;
pub mod traits;

// Platform implementations
#[cfg(target_arch = "avr")]
pub mod atmega32u4;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{GpioError, PlatformError, Result, TwiError};
pub use traits::{GpioInterface, GpioMode, TickTimer, TwiPort};
