//! TWI bus master protocol engine
//!
//! This module turns byte-level transactions into the bus's electrical
//! handshake sequence, validating every phase against the hardware's reported
//! status code.

mod twi;

pub use twi::{TwiConfig, TwiMaster, TwiStatus, DEFAULT_SPIN_BUDGET};
