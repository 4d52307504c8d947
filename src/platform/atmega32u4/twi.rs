//! ATmega32U4 TWI peripheral port
//!
//! Drives the TWI register block directly (TWBR/TWCR/TWDR/TWSR). One control
//! register write begins a phase; the hardware raises TWINT when the phase
//! completes and reports its outcome in the upper five status bits.

use crate::platform::traits::TwiPort;
use avr_device::atmega32u4::TWI;

/// TWI peripheral port over the hardware register block
///
/// Owning the register block gives this port exclusive use of the bus.
pub struct Twi {
    regs: TWI,
}

impl Twi {
    /// Take ownership of the TWI register block and enable the peripheral
    pub fn new(regs: TWI) -> Self {
        // Enable the module; no phase in flight yet
        regs.twcr.write(|w| w.twen().set_bit());
        Self { regs }
    }

    /// Release the register block
    pub fn release(self) -> TWI {
        self.regs
    }
}

impl TwiPort for Twi {
    fn set_bit_rate(&mut self, divider: u8) {
        // Prescaler bits TWPS1:0 = 0 (prescale 1); status bits are read-only
        self.regs.twsr.write(|w| unsafe { w.bits(0) });
        self.regs.twbr.write(|w| unsafe { w.bits(divider) });
    }

    fn begin_start(&mut self) {
        self.regs
            .twcr
            .write(|w| w.twint().set_bit().twsta().set_bit().twen().set_bit());
    }

    fn send_stop(&mut self) {
        self.regs
            .twcr
            .write(|w| w.twint().set_bit().twsto().set_bit().twen().set_bit());
    }

    fn begin_transmit(&mut self, byte: u8) {
        self.regs.twdr.write(|w| unsafe { w.bits(byte) });
        self.regs.twcr.write(|w| w.twint().set_bit().twen().set_bit());
    }

    fn begin_receive(&mut self, ack: bool) {
        self.regs
            .twcr
            .write(|w| w.twint().set_bit().twea().bit(ack).twen().set_bit());
    }

    fn data(&self) -> u8 {
        self.regs.twdr.read().bits()
    }

    fn phase_complete(&self) -> bool {
        self.regs.twcr.read().twint().bit_is_set()
    }

    fn status(&self) -> u8 {
        // Upper five bits; mask off the prescaler bits
        self.regs.twsr.read().bits() & 0xF8
    }
}
