//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod gpio;
pub mod timer;
pub mod twi;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use timer::TickTimer;
pub use twi::TwiPort;
