//! BNO055 TWI Driver Implementation
//!
//! Register access, lifecycle sequencing, and calibration management for the
//! BNO055 on top of the bus master engine.

use super::registers;
use super::types::{AxisData, CalibrationStatus, EulerAngles, ImuError, OperatingMode};
use crate::bus::TwiMaster;
use crate::platform::error::TwiError;
use crate::platform::traits::{GpioInterface, GpioMode, TwiPort};
use embedded_hal::delay::DelayNs;

/// Reset line hold time, milliseconds
const RESET_HOLD_MS: u32 = 10;

/// Boot time after a hardware or soft reset, milliseconds
const BOOT_MS: u32 = 650;

/// BNO055 driver
///
/// Owns the bus master engine and the sensor reset line. Delays are taken per
/// call so the caller keeps ownership of its delay source.
pub struct Bno055<P: TwiPort, R: GpioInterface> {
    bus: TwiMaster<P>,
    reset: R,
    address: u8,
}

impl<P: TwiPort, R: GpioInterface> Bno055<P, R> {
    /// Create a new driver at the default address (COM3 pin low)
    ///
    /// Nothing is read or written before [`initialize`](Self::initialize).
    pub fn new(bus: TwiMaster<P>, reset: R) -> Self {
        Self {
            bus,
            reset,
            address: registers::BNO055_ADDR,
        }
    }

    /// Use the alternative address (COM3 pin high)
    #[must_use]
    pub fn with_alternative_address(mut self) -> Self {
        self.address = registers::BNO055_ADDR_ALT;
        self
    }

    // ========================================================================
    // Register access
    // ========================================================================

    /// Write one device register
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), TwiError> {
        self.bus.write(self.address, &[reg, value])
    }

    /// Read one device register
    pub fn read_register(&mut self, reg: u8) -> Result<u8, TwiError> {
        let mut buf = [0u8; 1];
        self.read_block(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Read `buf.len()` contiguous device registers starting at `reg`
    pub fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), TwiError> {
        self.bus.write(self.address, &[reg])?;
        self.bus.read(self.address, buf)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Bring the sensor from reset into NDOF fusion mode
    ///
    /// Hardware-resets the device, verifies its identity, then switches to
    /// configuration mode, issues a soft reset, and enters NDOF. The identity
    /// check is the gate: on a mismatch no mode change is attempted.
    pub fn initialize(&mut self, delay: &mut impl DelayNs) -> Result<(), ImuError> {
        self.hardware_reset(delay)?;

        let id = self.read_register(registers::CHIP_ID)?;
        if id != registers::CHIP_ID_VALUE {
            crate::log_error!(
                "BNO055 chip id mismatch: expected {:#x}, got {:#x}",
                registers::CHIP_ID_VALUE,
                id
            );
            return Err(ImuError::InvalidChipId(id));
        }
        crate::log_info!("BNO055 detected (chip id {:#x})", id);

        self.set_mode(OperatingMode::Config, delay)?;
        self.soft_reset(delay)?;
        self.set_mode(OperatingMode::Ndof, delay)?;

        crate::log_info!("BNO055 initialized in NDOF fusion mode");
        Ok(())
    }

    /// Pulse the reset line and wait out the boot time
    ///
    /// Drives the line low for the hold time, releases it, then waits for the
    /// device to finish booting.
    pub fn hardware_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), ImuError> {
        self.reset
            .set_mode(GpioMode::OutputPushPull)
            .map_err(|_| ImuError::Reset)?;
        self.reset.set_low().map_err(|_| ImuError::Reset)?;
        delay.delay_ms(RESET_HOLD_MS);
        self.reset.set_high().map_err(|_| ImuError::Reset)?;
        delay.delay_ms(BOOT_MS);
        Ok(())
    }

    /// Soft-reset the device and wait out the reboot
    ///
    /// The register map returns to its power-on defaults; the device comes
    /// back up in configuration mode.
    pub fn soft_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), ImuError> {
        self.write_register(registers::SYS_TRIGGER, registers::SYS_TRIGGER_RST_SYS)?;
        delay.delay_ms(BOOT_MS);
        Ok(())
    }

    /// Switch the operating mode and wait out the switch time
    pub fn set_mode(
        &mut self,
        mode: OperatingMode,
        delay: &mut impl DelayNs,
    ) -> Result<(), ImuError> {
        self.write_register(registers::OPR_MODE, mode.bits())?;
        delay.delay_ms(mode.settle_ms());
        Ok(())
    }

    /// Read the current operating mode
    pub fn operating_mode(&mut self) -> Result<OperatingMode, ImuError> {
        Ok(OperatingMode::from_bits(
            self.read_register(registers::OPR_MODE)?,
        ))
    }

    // ========================================================================
    // Data output
    // ========================================================================

    /// Fused orientation as Euler angles (1/16 degree per LSB)
    pub fn euler_angles(&mut self) -> Result<EulerAngles, ImuError> {
        let [heading, roll, pitch] = self.read_vector(registers::EUL_HEADING_LSB)?;
        Ok(EulerAngles {
            heading,
            roll,
            pitch,
        })
    }

    /// Angular rate (1/16 degree per second per LSB)
    pub fn angular_rate(&mut self) -> Result<AxisData, ImuError> {
        let [x, y, z] = self.read_vector(registers::GYR_DATA_X_LSB)?;
        Ok(AxisData { x, y, z })
    }

    /// Linear acceleration, gravity removed (1/100 m/s^2 per LSB)
    pub fn linear_acceleration(&mut self) -> Result<AxisData, ImuError> {
        let [x, y, z] = self.read_vector(registers::LIA_DATA_X_LSB)?;
        Ok(AxisData { x, y, z })
    }

    /// Die temperature in degrees Celsius
    pub fn temperature(&mut self) -> Result<i8, ImuError> {
        Ok(self.read_register(registers::TEMP)? as i8)
    }

    /// Read a 6-byte data block as three little-endian i16 values
    fn read_vector(&mut self, base: u8) -> Result<[i16; 3], ImuError> {
        let mut buf = [0u8; 6];
        self.read_block(base, &mut buf)?;
        Ok([
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
        ])
    }

    // ========================================================================
    // Calibration
    // ========================================================================

    /// Per-subsystem calibration levels
    pub fn calibration_status(&mut self) -> Result<CalibrationStatus, ImuError> {
        Ok(CalibrationStatus::from_bits(
            self.read_register(registers::CALIB_STAT)?,
        ))
    }

    /// True when the system-level fusion calibration is at its maximum
    pub fn is_fully_calibrated(&mut self) -> Result<bool, ImuError> {
        Ok(self.calibration_status()?.is_fully_calibrated())
    }

    /// Write a previously saved offset/calibration profile
    ///
    /// The current operating mode is saved, the device switched to
    /// configuration mode for the block write, and the saved mode restored
    /// afterwards - also when the transfer aborts mid-sequence, in which case
    /// the abort is what gets reported. Bytes already written before an abort
    /// stay written.
    pub fn apply_offsets(
        &mut self,
        profile: &[u8; registers::OFFSET_BLOCK_LEN],
        delay: &mut impl DelayNs,
    ) -> Result<(), ImuError> {
        let saved = self.read_register(registers::OPR_MODE)?;
        self.set_mode(OperatingMode::Config, delay)?;

        let mut outcome = Ok(());
        for (i, &byte) in profile.iter().enumerate() {
            if let Err(e) = self.write_register(registers::ACC_OFFSET_X_LSB + i as u8, byte) {
                outcome = Err(ImuError::OffsetsAborted(e));
                break;
            }
        }

        let restore = self.set_mode(OperatingMode::from_bits(saved), delay);
        outcome.and(restore)
    }

    /// Read the device's offset/calibration profile
    ///
    /// Same mode bracketing and failure policy as
    /// [`apply_offsets`](Self::apply_offsets).
    pub fn read_offsets(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<[u8; registers::OFFSET_BLOCK_LEN], ImuError> {
        let saved = self.read_register(registers::OPR_MODE)?;
        self.set_mode(OperatingMode::Config, delay)?;

        let mut profile = [0u8; registers::OFFSET_BLOCK_LEN];
        let mut outcome = Ok(());
        for (i, slot) in profile.iter_mut().enumerate() {
            match self.read_register(registers::ACC_OFFSET_X_LSB + i as u8) {
                Ok(value) => *slot = value,
                Err(e) => {
                    outcome = Err(ImuError::OffsetsAborted(e));
                    break;
                }
            }
        }

        let restore = self.set_mode(OperatingMode::from_bits(saved), delay);
        outcome.and(restore)?;
        Ok(profile)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Borrow the bus master engine
    pub fn bus(&self) -> &TwiMaster<P> {
        &self.bus
    }

    /// Mutably borrow the bus master engine
    pub fn bus_mut(&mut self) -> &mut TwiMaster<P> {
        &mut self.bus
    }

    /// Consume the driver and return the engine and reset line
    pub fn release(self) -> (TwiMaster<P>, R) {
        (self.bus, self.reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockDelay, MockGpio, MockTwiPort};

    fn driver_with(port: MockTwiPort) -> Bno055<MockTwiPort, MockGpio> {
        Bno055::new(TwiMaster::new(port), MockGpio::new())
    }

    fn present_port() -> MockTwiPort {
        let mut port = MockTwiPort::new();
        port.set_reg(registers::CHIP_ID, registers::CHIP_ID_VALUE);
        port
    }

    #[test]
    fn test_initialize_brings_up_ndof() {
        let mut imu = driver_with(present_port());
        let mut delay = MockDelay::new();

        imu.initialize(&mut delay).unwrap();

        let (bus, reset) = imu.release();
        let port = bus.release();
        assert_eq!(port.reg(registers::OPR_MODE), OperatingMode::Ndof.bits());
        assert_eq!(port.reg(registers::SYS_TRIGGER), registers::SYS_TRIGGER_RST_SYS);
        // reset pulse: driven low, then released high
        assert_eq!(reset.transitions(), &[false, true]);
        // two boot waits plus the reset hold and both mode switches
        assert!(delay.elapsed_ms() >= 1345);
    }

    #[test]
    fn test_initialize_rejects_wrong_chip_id() {
        let mut port = MockTwiPort::new();
        port.set_reg(registers::CHIP_ID, 0x55);
        let mut imu = driver_with(port);
        let mut delay = MockDelay::new();

        assert_eq!(
            imu.initialize(&mut delay),
            Err(ImuError::InvalidChipId(0x55))
        );
        // no mode change was attempted
        let port = imu.release().0.release();
        assert_eq!(port.reg(registers::OPR_MODE), 0x00);
        assert_eq!(port.reg(registers::SYS_TRIGGER), 0x00);
    }

    #[test]
    fn test_initialize_surfaces_bus_failure() {
        let mut port = present_port();
        // chip id read: pointer write is phases 0-2, read is 3-5
        port.fail_phase(4, 0x48);
        let mut imu = driver_with(port);
        let mut delay = MockDelay::new();

        assert_eq!(
            imu.initialize(&mut delay),
            Err(ImuError::Twi(TwiError::Nack))
        );
    }

    #[test]
    fn test_euler_angles_decode_little_endian() {
        let mut port = present_port();
        // heading 360 * 16, roll -16, pitch 720
        port.set_regs(
            registers::EUL_HEADING_LSB,
            &[0x80, 0x16, 0xF0, 0xFF, 0xD0, 0x02],
        );
        let mut imu = driver_with(port);

        let euler = imu.euler_angles().unwrap();
        assert_eq!(
            euler,
            EulerAngles {
                heading: 5760,
                roll: -16,
                pitch: 720,
            }
        );
    }

    #[test]
    fn test_angular_rate_and_linear_acceleration() {
        let mut port = present_port();
        port.set_regs(registers::GYR_DATA_X_LSB, &[0x10, 0x00, 0x00, 0x80, 0xFF, 0x7F]);
        port.set_regs(registers::LIA_DATA_X_LSB, &[0x64, 0x00, 0x9C, 0xFF, 0x00, 0x00]);
        let mut imu = driver_with(port);

        assert_eq!(
            imu.angular_rate().unwrap(),
            AxisData {
                x: 16,
                y: i16::MIN,
                z: i16::MAX,
            }
        );
        assert_eq!(
            imu.linear_acceleration().unwrap(),
            AxisData { x: 100, y: -100, z: 0 }
        );
    }

    #[test]
    fn test_failed_sample_read_is_an_error() {
        let mut port = present_port();
        port.fail_phase(1, 0x20);
        let mut imu = driver_with(port);

        assert_eq!(
            imu.euler_angles(),
            Err(ImuError::Twi(TwiError::Nack))
        );
    }

    #[test]
    fn test_temperature_is_signed() {
        let mut port = present_port();
        port.set_reg(registers::TEMP, 0xF6);
        let mut imu = driver_with(port);
        assert_eq!(imu.temperature().unwrap(), -10);
    }

    #[test]
    fn test_is_fully_calibrated_requires_sys_level_three() {
        for (bits, expected) in [
            (0b00_00_00_00u8, false),
            (0b01_11_11_11, false),
            (0b10_11_11_11, false),
            (0b11_00_00_00, true),
        ] {
            let mut port = present_port();
            port.set_reg(registers::CALIB_STAT, bits);
            let mut imu = driver_with(port);
            assert_eq!(imu.is_fully_calibrated().unwrap(), expected, "bits {:#010b}", bits);
        }
    }

    #[test]
    fn test_calibration_status_fields() {
        let mut port = present_port();
        port.set_reg(registers::CALIB_STAT, 0b11_01_10_00);
        let mut imu = driver_with(port);

        let status = imu.calibration_status().unwrap();
        assert_eq!(status.sys, 3);
        assert_eq!(status.gyro, 1);
        assert_eq!(status.accel, 2);
        assert_eq!(status.mag, 0);
    }

    #[test]
    fn test_offsets_round_trip_and_mode_restore() {
        let mut port = present_port();
        port.set_reg(registers::OPR_MODE, OperatingMode::Ndof.bits());
        let mut imu = driver_with(port);
        let mut delay = MockDelay::new();

        let mut profile = [0u8; registers::OFFSET_BLOCK_LEN];
        for (i, byte) in profile.iter_mut().enumerate() {
            *byte = (i as u8) * 3 + 1;
        }

        imu.apply_offsets(&profile, &mut delay).unwrap();
        // block write landed while in configuration mode, mode restored after
        assert_eq!(imu.operating_mode().unwrap(), OperatingMode::Ndof);

        let read_back = imu.read_offsets(&mut delay).unwrap();
        assert_eq!(read_back, profile);
        assert_eq!(imu.operating_mode().unwrap(), OperatingMode::Ndof);
    }

    #[test]
    fn test_offsets_preserve_opaque_mode() {
        let mut port = present_port();
        port.set_reg(registers::OPR_MODE, 0x08); // IMU-only fusion, not driven by this stack
        let mut imu = driver_with(port);
        let mut delay = MockDelay::new();

        let profile = [0x11u8; registers::OFFSET_BLOCK_LEN];
        imu.apply_offsets(&profile, &mut delay).unwrap();
        assert_eq!(imu.operating_mode().unwrap(), OperatingMode::Other(0x08));
    }

    #[test]
    fn test_apply_offsets_aborts_but_restores_mode() {
        let mut port = present_port();
        port.set_reg(registers::OPR_MODE, OperatingMode::Ndof.bits());
        // mode read is phases 0-5, config switch 6-9; offset write k occupies
        // phases 10+4k..13+4k, so fail the value byte of the second write
        port.fail_phase(17, 0x30);
        let mut imu = driver_with(port);
        let mut delay = MockDelay::new();

        let profile = [0xAAu8; registers::OFFSET_BLOCK_LEN];
        assert_eq!(
            imu.apply_offsets(&profile, &mut delay),
            Err(ImuError::OffsetsAborted(TwiError::Nack))
        );

        // the saved mode was still restored, and only the first byte landed
        assert_eq!(imu.operating_mode().unwrap(), OperatingMode::Ndof);
        let port = imu.release().0.release();
        assert_eq!(port.reg(registers::ACC_OFFSET_X_LSB), 0xAA);
        assert_eq!(port.reg(registers::ACC_OFFSET_X_LSB + 1), 0x00);
    }

    #[test]
    fn test_read_offsets_aborts_but_restores_mode() {
        let mut port = present_port();
        port.set_reg(registers::OPR_MODE, OperatingMode::Ndof.bits());
        // mode read 0-5, config switch 6-9; offset read k occupies phases
        // 10+6k..15+6k (pointer write then one-byte read)
        port.fail_phase(16, 0x48);
        let mut imu = driver_with(port);
        let mut delay = MockDelay::new();

        assert_eq!(
            imu.read_offsets(&mut delay),
            Err(ImuError::OffsetsAborted(TwiError::Nack))
        );
        assert_eq!(imu.operating_mode().unwrap(), OperatingMode::Ndof);
    }

    #[test]
    fn test_hardware_reset_pulse() {
        let mut imu = driver_with(present_port());
        let mut delay = MockDelay::new();

        imu.hardware_reset(&mut delay).unwrap();
        let (_, reset) = imu.release();
        assert_eq!(reset.transitions(), &[false, true]);
        assert!(delay.elapsed_ms() >= 660);
    }

    #[test]
    fn test_read_block_contiguous() {
        let mut port = present_port();
        port.set_regs(0x20, &[1, 2, 3, 4]);
        let mut imu = driver_with(port);

        let mut buf = [0u8; 4];
        imu.read_block(0x20, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }
}
