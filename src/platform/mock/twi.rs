//! Mock TWI port implementation for testing
//!
//! Simulates the TWI peripheral together with a byte-addressed register
//! target behind it. Every `begin_*` call completes instantly with the status
//! code real hardware would report for a well-behaved target; individual
//! phases can be overridden to fail with an arbitrary status code or to
//! stall forever.
//!
//! Phases are numbered from zero in the order they are begun (STOP conditions
//! report no status and do not consume a phase number). A write of N bytes is
//! phases `0` (START), `1` (address header), `2..2+N` (data); a combined
//! register read continues numbering into the second transaction.

use crate::platform::traits::TwiPort;
use heapless::Vec;

// Hardware status codes (upper five bits of the status register)
const STATUS_START: u8 = 0x08;
const STATUS_REP_START: u8 = 0x10;
const STATUS_SLA_W_ACK: u8 = 0x18;
const STATUS_SLA_R_ACK: u8 = 0x40;
const STATUS_DATA_SENT_ACK: u8 = 0x28;
const STATUS_DATA_RECV_ACK: u8 = 0x50;
const STATUS_DATA_RECV_NACK: u8 = 0x58;

/// Bus-level event recorded by the mock port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwiEvent {
    /// START or repeated START condition
    Start,
    /// STOP condition
    Stop,
    /// Byte transmitted (address header or data)
    Transmit(u8),
    /// Byte received, with the master's acknowledge choice
    Receive {
        /// Whether the master acknowledged the byte
        ack: bool,
    },
}

/// Scripted outcome for one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseOverride {
    /// Complete with this status code instead of the computed one
    Status(u8),
    /// Never complete (stuck bus)
    Stall,
}

/// Mock TWI port
///
/// Records all bus events for test verification and services reads/writes
/// from a simulated 256-byte register file with an auto-incrementing
/// register pointer, which is how the BNO055 (and most register-mapped
/// targets) behaves.
#[derive(Debug)]
pub struct MockTwiPort {
    regs: [u8; 256],
    reg_ptr: u8,
    /// Next transmitted byte is an address header
    header_pending: bool,
    /// Next transmitted data byte latches the register pointer
    address_latch: bool,
    /// START seen since the last STOP
    in_transaction: bool,
    bit_rate: Option<u8>,
    overrides: Vec<(usize, PhaseOverride), 8>,
    events: Vec<TwiEvent, 512>,
    /// Index of the next phase to begin
    phase: usize,
    complete: bool,
    status: u8,
    data: u8,
}

impl MockTwiPort {
    /// Create a new mock port with a zeroed register file
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            reg_ptr: 0,
            header_pending: false,
            address_latch: false,
            in_transaction: false,
            bit_rate: None,
            overrides: Vec::new(),
            events: Vec::new(),
            phase: 0,
            complete: false,
            status: 0,
            data: 0,
        }
    }

    /// Set one simulated register
    pub fn set_reg(&mut self, addr: u8, value: u8) {
        self.regs[addr as usize] = value;
    }

    /// Set a contiguous run of simulated registers
    pub fn set_regs(&mut self, base: u8, values: &[u8]) {
        for (i, &value) in values.iter().enumerate() {
            self.regs[base as usize + i] = value;
        }
    }

    /// Read back one simulated register
    pub fn reg(&self, addr: u8) -> u8 {
        self.regs[addr as usize]
    }

    /// Make phase `index` complete with `status` instead of succeeding
    pub fn fail_phase(&mut self, index: usize, status: u8) {
        self.overrides
            .push((index, PhaseOverride::Status(status)))
            .expect("too many phase overrides");
    }

    /// Make phase `index` never complete
    pub fn stall_phase(&mut self, index: usize) {
        self.overrides
            .push((index, PhaseOverride::Stall))
            .expect("too many phase overrides");
    }

    /// Recorded bus events, in order
    pub fn events(&self) -> &[TwiEvent] {
        &self.events
    }

    /// Clear the recorded event log
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// The last programmed bit-rate divider, if any
    pub fn bit_rate(&self) -> Option<u8> {
        self.bit_rate
    }

    /// Number of recorded events matching `predicate`
    pub fn count_events(&self, predicate: impl Fn(&TwiEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    fn override_for(&self, index: usize) -> Option<PhaseOverride> {
        self.overrides
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, o)| *o)
    }

    fn record(&mut self, event: TwiEvent) {
        self.events.push(event).expect("mock event log full");
    }

    fn finish_phase(&mut self, computed: u8) {
        let index = self.phase;
        self.phase += 1;
        match self.override_for(index) {
            Some(PhaseOverride::Stall) => self.complete = false,
            Some(PhaseOverride::Status(code)) => {
                self.status = code;
                self.complete = true;
            }
            None => {
                self.status = computed;
                self.complete = true;
            }
        }
    }

    /// True when an override suppresses the side effects of phase `index`
    fn faulted(&self, index: usize) -> bool {
        self.override_for(index).is_some()
    }
}

impl Default for MockTwiPort {
    fn default() -> Self {
        Self::new()
    }
}

impl TwiPort for MockTwiPort {
    fn set_bit_rate(&mut self, divider: u8) {
        self.bit_rate = Some(divider);
    }

    fn begin_start(&mut self) {
        self.record(TwiEvent::Start);
        let computed = if self.in_transaction {
            STATUS_REP_START
        } else {
            STATUS_START
        };
        self.in_transaction = true;
        self.header_pending = true;
        self.finish_phase(computed);
    }

    fn send_stop(&mut self) {
        self.record(TwiEvent::Stop);
        self.in_transaction = false;
        self.header_pending = false;
        self.complete = false;
    }

    fn begin_transmit(&mut self, byte: u8) {
        self.record(TwiEvent::Transmit(byte));
        let faulted = self.faulted(self.phase);
        let computed = if self.header_pending {
            self.header_pending = false;
            if byte & 1 == 1 {
                STATUS_SLA_R_ACK
            } else {
                self.address_latch = true;
                STATUS_SLA_W_ACK
            }
        } else {
            if !faulted {
                if self.address_latch {
                    self.reg_ptr = byte;
                    self.address_latch = false;
                } else {
                    self.regs[self.reg_ptr as usize] = byte;
                    self.reg_ptr = self.reg_ptr.wrapping_add(1);
                }
            }
            STATUS_DATA_SENT_ACK
        };
        self.finish_phase(computed);
    }

    fn begin_receive(&mut self, ack: bool) {
        self.record(TwiEvent::Receive { ack });
        if !self.faulted(self.phase) {
            self.data = self.regs[self.reg_ptr as usize];
            self.reg_ptr = self.reg_ptr.wrapping_add(1);
        }
        let computed = if ack {
            STATUS_DATA_RECV_ACK
        } else {
            STATUS_DATA_RECV_NACK
        };
        self.finish_phase(computed);
    }

    fn data(&self) -> u8 {
        self.data
    }

    fn phase_complete(&self) -> bool {
        self.complete
    }

    fn status(&self) -> u8 {
        self.status
    }
}
