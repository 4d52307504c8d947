//! TWI peripheral port trait
//!
//! This module defines the raw two-wire peripheral port that platform
//! implementations must provide. The port exposes the peripheral's byte-wide
//! micro-operations; the protocol sequencing and status validation live in
//! [`crate::bus::TwiMaster`].

/// Raw TWI peripheral port
///
/// One `begin_*` call starts one electrical phase (START, address/data byte
/// out, data byte in). The phase runs in hardware; [`phase_complete`] reports
/// its completion and [`status`] the hardware's verdict on it. A STOP
/// condition completes on its own and reports no status.
///
/// # Safety Invariants
///
/// - The peripheral must be enabled before the first phase is begun
/// - Only one owner per bus instance
/// - No concurrent access to the same bus from multiple contexts
///
/// [`phase_complete`]: Self::phase_complete
/// [`status`]: Self::status
pub trait TwiPort {
    /// Program the bit-rate divider (prescaler fixed at 1)
    ///
    /// The resulting SCL frequency is `core_clock / (16 + 2 * divider)`.
    fn set_bit_rate(&mut self, divider: u8);

    /// Begin transmitting a START condition
    ///
    /// On a bus already held by this master the hardware transmits a
    /// repeated START instead; the status code distinguishes the two.
    fn begin_start(&mut self);

    /// Transmit a STOP condition, releasing the bus
    ///
    /// Completes on its own; no phase-complete wait and no status follow.
    fn send_stop(&mut self);

    /// Load `byte` (address header or data) and begin transmitting it
    fn begin_transmit(&mut self, byte: u8);

    /// Begin receiving one byte
    ///
    /// `ack` selects whether the byte will be acknowledged, keeping the
    /// target transmitting, or not acknowledged, signalling the final byte.
    fn begin_receive(&mut self, ack: bool);

    /// The byte captured by the most recent completed receive phase
    fn data(&self) -> u8;

    /// True once the phase begun by the last `begin_*` call has completed
    fn phase_complete(&self) -> bool;

    /// Raw status code of the most recent completed phase
    ///
    /// Upper five bits of the hardware status register; prescaler bits
    /// masked off.
    fn status(&self) -> u8;
}
