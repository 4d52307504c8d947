//! TWI bus master engine implementation
//!
//! Drives a [`TwiPort`] through start / address / data / stop phases. Each
//! phase is begun on the port, busy-polled to completion, and its status code
//! checked against the exact code expected for that phase. Any mismatch
//! aborts the transaction; every abort path issues a STOP so the bus is never
//! left held mid-transaction.

use crate::platform::error::TwiError;
use crate::platform::traits::TwiPort;

/// Default phase-wait spin budget
///
/// Poll iterations before a non-completing phase is reported as
/// [`TwiError::Timeout`]. Sized to cover several byte times at 100 kHz with a
/// wide margin; well-behaved hardware never comes close.
pub const DEFAULT_SPIN_BUDGET: u32 = 100_000;

/// Outcome of one completed bus phase, decoded from the raw status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiStatus {
    /// START condition transmitted
    StartSent,
    /// Repeated START condition transmitted
    RepeatedStartSent,
    /// Address + write bit transmitted, target acknowledged
    AddressWriteAcked,
    /// Address + read bit transmitted, target acknowledged
    AddressReadAcked,
    /// Data byte transmitted, target acknowledged
    DataSentAcked,
    /// Data byte received and acknowledged by this master
    DataReceivedAcked,
    /// Data byte received, not acknowledged (final byte of a read)
    DataReceivedNacked,
    /// Any other hardware status code
    Fault(u8),
}

impl TwiStatus {
    /// Decode the upper-five-bit hardware status code
    pub fn from_code(code: u8) -> Self {
        match code {
            0x08 => TwiStatus::StartSent,
            0x10 => TwiStatus::RepeatedStartSent,
            0x18 => TwiStatus::AddressWriteAcked,
            0x40 => TwiStatus::AddressReadAcked,
            0x28 => TwiStatus::DataSentAcked,
            0x50 => TwiStatus::DataReceivedAcked,
            0x58 => TwiStatus::DataReceivedNacked,
            other => TwiStatus::Fault(other),
        }
    }

    /// The raw hardware status code
    pub fn code(self) -> u8 {
        match self {
            TwiStatus::StartSent => 0x08,
            TwiStatus::RepeatedStartSent => 0x10,
            TwiStatus::AddressWriteAcked => 0x18,
            TwiStatus::AddressReadAcked => 0x40,
            TwiStatus::DataSentAcked => 0x28,
            TwiStatus::DataReceivedAcked => 0x50,
            TwiStatus::DataReceivedNacked => 0x58,
            TwiStatus::Fault(code) => code,
        }
    }
}

/// TWI bus configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiConfig {
    /// Target SCL frequency in Hz (typically 100_000 or 400_000)
    pub bus_hz: u32,
    /// Core clock frequency the divider is derived from
    pub core_hz: u32,
    /// Phase-wait spin budget
    pub spin_budget: u32,
}

impl Default for TwiConfig {
    fn default() -> Self {
        Self {
            bus_hz: 400_000,    // 400 kHz fast mode
            core_hz: 16_000_000,
            spin_budget: DEFAULT_SPIN_BUDGET,
        }
    }
}

/// TWI bus master engine
///
/// Owns the peripheral port and implements the minimal two-wire master state
/// machine: START, 7-bit address plus direction bit, then a bounded sequence
/// of acknowledged bytes, terminated with a STOP.
///
/// Failures are terminal per transaction; there are no retries at this layer.
pub struct TwiMaster<P: TwiPort> {
    port: P,
    spin_budget: u32,
}

impl<P: TwiPort> TwiMaster<P> {
    /// Create a new engine over `port` with the default spin budget
    ///
    /// Call [`configure`](Self::configure) before the first transaction.
    pub fn new(port: P) -> Self {
        Self {
            port,
            spin_budget: DEFAULT_SPIN_BUDGET,
        }
    }

    /// Replace the phase-wait spin budget
    #[must_use]
    pub fn with_spin_budget(mut self, spin_budget: u32) -> Self {
        self.spin_budget = spin_budget;
        self
    }

    /// Program the bus clock divider and adopt the configured spin budget
    ///
    /// The divider is rounded up so the achieved SCL frequency never exceeds
    /// `config.bus_hz`.
    pub fn configure(&mut self, config: TwiConfig) {
        self.spin_budget = config.spin_budget;
        self.port
            .set_bit_rate(bit_rate_divider(config.bus_hz, config.core_hz));
    }

    /// Write `bytes` to the target at 7-bit address `addr`
    ///
    /// Issues START, SLA+W, every byte in sequence, then STOP. Any phase
    /// whose status is not the expected one aborts with a STOP and reports
    /// the failure.
    pub fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), TwiError> {
        self.start(addr, false)?;
        for &byte in bytes {
            self.port.begin_transmit(byte);
            self.expect_status(TwiStatus::DataSentAcked)?;
        }
        self.port.send_stop();
        Ok(())
    }

    /// Read `buf.len()` bytes from the target at 7-bit address `addr`
    ///
    /// Every byte except the last is acknowledged, keeping the target
    /// transmitting; the final byte is not acknowledged, telling the target
    /// the read is over. An empty buffer returns without touching the bus.
    pub fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), TwiError> {
        if buf.is_empty() {
            return Ok(());
        }
        self.start(addr, true)?;
        let last = buf.len() - 1;
        for (i, slot) in buf.iter_mut().enumerate() {
            let ack = i < last;
            self.port.begin_receive(ack);
            let expected = if ack {
                TwiStatus::DataReceivedAcked
            } else {
                TwiStatus::DataReceivedNacked
            };
            self.expect_status(expected)?;
            *slot = self.port.data();
        }
        self.port.send_stop();
        Ok(())
    }

    /// Borrow the underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutably borrow the underlying port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Consume the engine and return the port
    pub fn release(self) -> P {
        self.port
    }

    /// START phase followed by the address header
    fn start(&mut self, addr: u8, read: bool) -> Result<(), TwiError> {
        self.port.begin_start();
        let status = self.wait_phase()?;
        if !matches!(
            status,
            TwiStatus::StartSent | TwiStatus::RepeatedStartSent
        ) {
            return Err(self.abort(status));
        }

        self.port.begin_transmit((addr << 1) | u8::from(read));
        let expected = if read {
            TwiStatus::AddressReadAcked
        } else {
            TwiStatus::AddressWriteAcked
        };
        self.expect_status(expected)
    }

    /// Wait for the current phase and require an exact status
    fn expect_status(&mut self, expected: TwiStatus) -> Result<(), TwiError> {
        let status = self.wait_phase()?;
        if status != expected {
            return Err(self.abort(status));
        }
        Ok(())
    }

    /// Busy-poll the phase-complete flag within the spin budget
    ///
    /// Budget exhaustion releases the bus and reports a timeout.
    fn wait_phase(&mut self) -> Result<TwiStatus, TwiError> {
        let mut budget = self.spin_budget;
        while !self.port.phase_complete() {
            budget = match budget.checked_sub(1) {
                Some(remaining) => remaining,
                None => {
                    self.port.send_stop();
                    return Err(TwiError::Timeout);
                }
            };
            core::hint::spin_loop();
        }
        Ok(TwiStatus::from_code(self.port.status()))
    }

    /// Release the bus after an unexpected status and classify it
    fn abort(&mut self, status: TwiStatus) -> TwiError {
        self.port.send_stop();
        match status.code() {
            // Address or data byte not acknowledged by the target
            0x20 | 0x30 | 0x48 => TwiError::Nack,
            0x38 => TwiError::ArbitrationLost,
            other => TwiError::Bus(other),
        }
    }
}

/// Bit-rate register value for the requested SCL frequency
///
/// SCL = core / (16 + 2 * divider) with the prescaler fixed at 1, so the
/// divider is (core / SCL - 16) / 2, rounded up to stay at or below the
/// target rate, and clamped to the register's range.
fn bit_rate_divider(bus_hz: u32, core_hz: u32) -> u8 {
    let cycles_per_bit = core_hz.div_ceil(bus_hz);
    cycles_per_bit.saturating_sub(16).div_ceil(2).min(255) as u8
}
