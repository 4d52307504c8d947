//! BNO055 Register Definitions
//!
//! Page 0 registers, per the Bosch BST-BNO055-DS000 datasheet.

#![allow(dead_code)]

// ============================================================================
// BNO055 TWI Address
// ============================================================================

/// BNO055 address with the COM3 pin low
pub const BNO055_ADDR: u8 = 0x28;

/// BNO055 address with the COM3 pin high
pub const BNO055_ADDR_ALT: u8 = 0x29;

// ============================================================================
// Identification
// ============================================================================

/// Chip identification register
pub const CHIP_ID: u8 = 0x00;

/// Expected `CHIP_ID` value
pub const CHIP_ID_VALUE: u8 = 0xA0;

// ============================================================================
// Data output blocks (three little-endian i16 values each)
// ============================================================================

/// Gyroscope data block base (X LSB)
pub const GYR_DATA_X_LSB: u8 = 0x14;

/// Fused Euler angle block base (heading LSB); 1 LSB = 1/16 degree
pub const EUL_HEADING_LSB: u8 = 0x1A;

/// Linear acceleration block base (X LSB); 1 LSB = 1/100 m/s^2
pub const LIA_DATA_X_LSB: u8 = 0x28;

/// Die temperature, signed, degrees Celsius
pub const TEMP: u8 = 0x34;

// ============================================================================
// Status and control
// ============================================================================

/// Calibration status: 2-bit fields, SYS in bits 7:6, GYR 5:4, ACC 3:2, MAG 1:0
pub const CALIB_STAT: u8 = 0x35;

/// Operating mode register
pub const OPR_MODE: u8 = 0x3D;

/// Power mode register
pub const PWR_MODE: u8 = 0x3E;

/// System trigger register
pub const SYS_TRIGGER: u8 = 0x3F;

/// `SYS_TRIGGER` bit requesting a system reset
pub const SYS_TRIGGER_RST_SYS: u8 = 0x20;

// ============================================================================
// Calibration offset block
// ============================================================================

/// First register of the persisted offset/calibration block (ACC_OFFSET_X_LSB)
pub const ACC_OFFSET_X_LSB: u8 = 0x55;

/// Last register of the persisted offset/calibration block (MAG_RADIUS_MSB)
pub const MAG_RADIUS_MSB: u8 = 0x6A;

/// Length of the offset/calibration block in bytes
pub const OFFSET_BLOCK_LEN: usize = (MAG_RADIUS_MSB - ACC_OFFSET_X_LSB + 1) as usize;
