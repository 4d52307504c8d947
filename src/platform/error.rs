//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their hardware-specific conditions to
/// these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// TWI bus operation failed
    Twi(TwiError),
    /// GPIO operation failed
    Gpio(GpioError),
}

/// TWI-specific errors
///
/// Reported per transaction by the bus master engine. `Bus` carries the raw
/// status code of the offending phase so callers that want more than
/// pass/fail can tell what the hardware reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// Target did not acknowledge its address or a data byte
    Nack,
    /// Bus arbitration lost to another master
    ArbitrationLost,
    /// Unexpected status code at some phase (raw code included)
    Bus(u8),
    /// Phase-wait spin budget exhausted (stuck bus)
    Timeout,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid mode for operation (e.g. driving a pin configured as input)
    InvalidMode,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Twi(e) => write!(f, "TWI error: {}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
        }
    }
}

impl fmt::Display for TwiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwiError::Nack => write!(f, "target did not acknowledge"),
            TwiError::ArbitrationLost => write!(f, "bus arbitration lost"),
            TwiError::Bus(code) => write!(f, "unexpected bus status {:#04x}", code),
            TwiError::Timeout => write!(f, "phase wait timed out"),
        }
    }
}

impl From<TwiError> for PlatformError {
    fn from(error: TwiError) -> Self {
        PlatformError::Twi(error)
    }
}

impl From<GpioError> for PlatformError {
    fn from(error: GpioError) -> Self {
        PlatformError::Gpio(error)
    }
}
