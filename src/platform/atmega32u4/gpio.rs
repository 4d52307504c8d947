//! ATmega32U4 reset pin
//!
//! Drives one PORTD pin as the sensor reset line.

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use avr_device::atmega32u4::PORTD;

/// Sensor reset line on a PORTD pin
///
/// Owns the whole PORTD register block; this stack drives no other PORTD
/// pins.
pub struct ResetPin {
    regs: PORTD,
    mask: u8,
    mode: GpioMode,
}

impl ResetPin {
    /// Take ownership of PORTD and select pin `pin` (0-7)
    ///
    /// The pin starts as an input; [`GpioInterface::set_mode`] switches it to
    /// an output before it is driven.
    pub fn new(regs: PORTD, pin: u8) -> Self {
        Self {
            regs,
            mask: 1 << pin,
            mode: GpioMode::Input,
        }
    }

    /// Release the register block
    pub fn release(self) -> PORTD {
        self.regs
    }
}

impl GpioInterface for ResetPin {
    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        match mode {
            GpioMode::OutputPushPull => self
                .regs
                .ddrd
                .modify(|r, w| unsafe { w.bits(r.bits() | self.mask) }),
            GpioMode::Input => self
                .regs
                .ddrd
                .modify(|r, w| unsafe { w.bits(r.bits() & !self.mask) }),
        }
        self.mode = mode;
        Ok(())
    }

    fn set_high(&mut self) -> Result<()> {
        if self.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.regs
            .portd
            .modify(|r, w| unsafe { w.bits(r.bits() | self.mask) });
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        if self.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.regs
            .portd
            .modify(|r, w| unsafe { w.bits(r.bits() & !self.mask) });
        Ok(())
    }

    fn read(&self) -> bool {
        self.regs.pind.read().bits() & self.mask != 0
    }
}
