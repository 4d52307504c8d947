//! Cycle-counted busy delay
//!
//! Blocking delay provider for reset and mode-switch settle times. Accuracy
//! is a few percent, which is ample for the hundreds-of-milliseconds waits
//! this stack needs.

use embedded_hal::delay::DelayNs;

/// Iteration cost of the delay loop in CPU cycles (nop + decrement + branch)
const CYCLES_PER_ITER: u64 = 4;

/// Busy-loop delay calibrated against the core clock
#[derive(Debug, Clone, Copy)]
pub struct CycleDelay {
    core_hz: u32,
}

impl CycleDelay {
    /// Create a delay provider for a core running at `core_hz`
    pub const fn new(core_hz: u32) -> Self {
        Self { core_hz }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(self.core_hz) / 1_000_000_000;
        let mut iters = cycles / CYCLES_PER_ITER;
        while iters > 0 {
            avr_device::asm::nop();
            iters -= 1;
        }
    }
}
