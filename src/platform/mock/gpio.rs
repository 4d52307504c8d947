//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use heapless::Vec;

/// Mock GPIO implementation
///
/// Tracks pin state and mode, and records every driven level transition so
/// tests can verify pulse sequences (e.g. the sensor reset pulse).
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    transitions: Vec<bool, 16>,
}

impl MockGpio {
    /// Create a new mock GPIO in input mode, reading high
    ///
    /// High matches an externally pulled-up reset line at rest.
    pub fn new() -> Self {
        Self {
            state: true,
            mode: GpioMode::Input,
            transitions: Vec::new(),
        }
    }

    /// Set the input state (for simulating input pin reads)
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
    }

    /// Driven level transitions, in order
    pub fn transitions(&self) -> &[bool] {
        &self.transitions
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioInterface for MockGpio {
    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn set_high(&mut self) -> Result<()> {
        match self.mode {
            GpioMode::OutputPushPull => {
                self.state = true;
                self.transitions.push(true).ok();
                Ok(())
            }
            _ => Err(PlatformError::Gpio(GpioError::InvalidMode)),
        }
    }

    fn set_low(&mut self) -> Result<()> {
        match self.mode {
            GpioMode::OutputPushPull => {
                self.state = false;
                self.transitions.push(false).ok();
                Ok(())
            }
            _ => Err(PlatformError::Gpio(GpioError::InvalidMode)),
        }
    }

    fn read(&self) -> bool {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gpio_output() {
        let mut gpio = MockGpio::new();
        gpio.set_mode(GpioMode::OutputPushPull).unwrap();

        gpio.set_low().unwrap();
        assert!(!gpio.read());

        gpio.set_high().unwrap();
        assert!(gpio.read());

        assert_eq!(gpio.transitions(), &[false, true]);
    }

    #[test]
    fn test_mock_gpio_input_rejects_drive() {
        let mut gpio = MockGpio::new();
        assert!(gpio.set_high().is_err());
        assert!(gpio.set_low().is_err());

        gpio.set_input_state(false);
        assert!(!gpio.read());
    }
}
