//! Device drivers
//!
//! This module contains sensor drivers built on the platform abstraction.

pub mod bno055;

pub use bno055::Bno055;
