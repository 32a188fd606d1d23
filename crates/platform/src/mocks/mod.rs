//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use crate::registers::{RegisterBus, RegisterWrite};
use crate::scanout::{HandshakeError, ScanoutHardware};

/// Register file that records every store.
pub struct MockRegisters {
    log: heapless::Vec<RegisterWrite, 256>,
}

impl MockRegisters {
    /// Create an empty register file.
    pub fn new() -> Self {
        Self {
            log: heapless::Vec::new(),
        }
    }

    /// Every store, in order.
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.log
    }

    /// Last value stored to `addr`, if any.
    pub fn last(&self, addr: u32) -> Option<u32> {
        self.log
            .iter()
            .rev()
            .find(|write| write.addr == addr)
            .map(|write| write.value)
    }

    /// Forget recorded stores.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for MockRegisters {
    fn write(&mut self, write: RegisterWrite) {
        // Oldest stores are kept; tests never exceed the capacity.
        let _ = self.log.push(write);
    }
}

/// Calls observed by [`MockScanout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanoutEvent {
    /// `configure_output(pin_base, pixel_clock_hz)`
    Output {
        /// First output pin.
        pin_base: u8,
        /// Requested pixel clock.
        pixel_clock_hz: u32,
    },
    /// `configure_chain(chain_addr)`
    Chain(usize),
    /// `enable_completion_irq()`
    Irq,
    /// `start()`
    Start,
    /// `stop_output()`
    Stop,
}

/// Scanout that records calls and can be told to fail the handshake.
pub struct MockScanout {
    events: heapless::Vec<ScanoutEvent, 16>,
    handshake: Result<(), HandshakeError>,
}

impl MockScanout {
    /// Scanout whose handshake succeeds.
    pub fn new() -> Self {
        Self {
            events: heapless::Vec::new(),
            handshake: Ok(()),
        }
    }

    /// Scanout whose handshake fails with `error`.
    pub fn failing(error: HandshakeError) -> Self {
        Self {
            events: heapless::Vec::new(),
            handshake: Err(error),
        }
    }

    /// Calls so far, in order.
    pub fn events(&self) -> &[ScanoutEvent] {
        &self.events
    }

    /// Whether `start` was called.
    pub fn started(&self) -> bool {
        self.events.contains(&ScanoutEvent::Start)
    }

    /// Address passed to `configure_chain`, if it was called.
    pub fn chain_addr(&self) -> Option<usize> {
        self.events.iter().find_map(|event| match event {
            ScanoutEvent::Chain(addr) => Some(*addr),
            _ => None,
        })
    }

    fn record(&mut self, event: ScanoutEvent) {
        let _ = self.events.push(event);
    }
}

impl Default for MockScanout {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanoutHardware for MockScanout {
    fn configure_output(&mut self, pin_base: u8, pixel_clock_hz: u32) {
        self.record(ScanoutEvent::Output {
            pin_base,
            pixel_clock_hz,
        });
    }

    fn configure_chain(&mut self, chain_addr: usize) {
        self.record(ScanoutEvent::Chain(chain_addr));
    }

    fn enable_completion_irq(&mut self) -> Result<(), HandshakeError> {
        self.record(ScanoutEvent::Irq);
        self.handshake
    }

    fn start(&mut self) {
        self.record(ScanoutEvent::Start);
    }

    fn stop_output(&mut self) {
        self.record(ScanoutEvent::Stop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_registers() {
        let mut regs = MockRegisters::new();
        regs.apply(&[
            RegisterWrite::new(0x10, 1),
            RegisterWrite::new(0x14, 2),
            RegisterWrite::new(0x10, 3),
        ]);
        assert_eq!(regs.writes().len(), 3);
        assert_eq!(regs.last(0x10), Some(3));
        assert_eq!(regs.last(0x18), None);
    }

    #[test]
    fn test_mock_scanout_order() {
        let mut scanout = MockScanout::new();
        scanout.configure_output(2, 12_588_000);
        scanout.configure_chain(0x2000_0000);
        assert!(scanout.enable_completion_irq().is_ok());
        scanout.start();
        assert!(scanout.started());
        assert_eq!(scanout.chain_addr(), Some(0x2000_0000));
        assert_eq!(scanout.events().len(), 4);
    }

    #[test]
    fn test_mock_scanout_failure() {
        let mut scanout = MockScanout::failing(HandshakeError::Timeout);
        assert_eq!(scanout.enable_completion_irq(), Err(HandshakeError::Timeout));
        assert!(!scanout.started());
    }
}
