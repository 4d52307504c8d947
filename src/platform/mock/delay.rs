//! Mock delay implementation for testing

use embedded_hal::delay::DelayNs;

/// Mock delay provider
///
/// Accumulates requested delays as simulated time instead of sleeping, so
/// tests can verify settle intervals without waiting for them.
#[derive(Debug, Default)]
pub struct MockDelay {
    elapsed_ns: u64,
}

impl MockDelay {
    /// Create a new mock delay with zero elapsed time
    pub fn new() -> Self {
        Self::default()
    }

    /// Total simulated time, in microseconds
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }

    /// Total simulated time, in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
