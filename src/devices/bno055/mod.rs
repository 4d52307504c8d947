//! BNO055 9-Axis Absolute Orientation IMU Driver
//!
//! TWI driver for the Bosch Sensortec BNO055 with on-chip sensor fusion.
//!
//! ## Features
//!
//! - Hardware reset, identity check, and bring-up into NDOF fusion mode
//! - Fused orientation (Euler), angular rate, and linear acceleration reads
//! - Calibration status query and 22-byte offset profile save/restore
//!
//! ## Usage
//!
//! ```ignore
//! use bno055_twi::bus::{TwiConfig, TwiMaster};
//! use bno055_twi::devices::bno055::Bno055;
//!
//! let mut twi = TwiMaster::new(port);
//! twi.configure(TwiConfig::default());
//!
//! let mut imu = Bno055::new(twi, reset_pin);
//! imu.initialize(&mut delay)?;
//! let euler = imu.euler_angles()?;
//! ```

mod driver;
pub mod registers;
mod types;

pub use driver::Bno055;
pub use types::{AxisData, CalibrationStatus, EulerAngles, ImuError, OperatingMode};
