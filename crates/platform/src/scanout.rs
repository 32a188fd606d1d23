//! Scanout hardware abstraction
//!
//! The video engine talks to the PIO/DMA pair through [`ScanoutHardware`],
//! so initialization order and failure handling can be exercised on the host
//! with [`crate::mocks::MockScanout`]. The RP2040 implementation lives in the
//! `pico-vga` crate.

use crate::dma::ScanoutChannels;

/// Failure of the one-shot startup rendezvous with the interrupt core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeError {
    /// No mark arrived within the poll budget.
    Timeout,
    /// A mark arrived but was not the one expected at this step.
    UnexpectedMark {
        /// Mark the protocol requires.
        expected: u32,
        /// Mark actually received.
        received: u32,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for HandshakeError {}

impl core::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "interrupt core did not answer the handshake"),
            Self::UnexpectedMark { expected, received } => write!(
                f,
                "handshake mark mismatch: expected {expected:#010x}, received {received:#010x}"
            ),
        }
    }
}

/// What the completion interrupt needs to service the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqContext {
    /// Channels and state machine in use.
    pub channels: ScanoutChannels,
    /// First descriptor of the chain.
    pub chain_addr: usize,
}

/// PIO + DMA scanout, driven in this order by the engine:
///
/// 1. [`configure_output`](Self::configure_output)
/// 2. [`configure_chain`](Self::configure_chain)
/// 3. [`enable_completion_irq`](Self::enable_completion_irq)
/// 4. [`start`](Self::start)
///
/// Step 1 already runs the state machine, which drives the pins low while
/// its FIFO is empty. If step 3 fails the engine calls
/// [`stop_output`](Self::stop_output) so the pins are released instead of
/// holding both syncs asserted.
pub trait ScanoutHardware {
    /// Route `VGA_PIN_COUNT` pins from `pin_base` to the pixel state machine
    /// and run it at `pixel_clock_hz`.
    fn configure_output(&mut self, pin_base: u8, pixel_clock_hz: u32);

    /// Point the control channel at the descriptor chain at `chain_addr`.
    fn configure_chain(&mut self, chain_addr: usize);

    /// Install the end-of-chain interrupt, possibly on another core.
    fn enable_completion_irq(&mut self) -> Result<(), HandshakeError>;

    /// Trigger the first descriptor.
    fn start(&mut self);

    /// Halt the state machine and release the pins claimed by
    /// `configure_output`.
    fn stop_output(&mut self);
}

impl<T: ScanoutHardware + ?Sized> ScanoutHardware for &mut T {
    fn configure_output(&mut self, pin_base: u8, pixel_clock_hz: u32) {
        (**self).configure_output(pin_base, pixel_clock_hz);
    }

    fn configure_chain(&mut self, chain_addr: usize) {
        (**self).configure_chain(chain_addr);
    }

    fn enable_completion_irq(&mut self) -> Result<(), HandshakeError> {
        (**self).enable_completion_irq()
    }

    fn start(&mut self) {
        (**self).start();
    }

    fn stop_output(&mut self) {
        (**self).stop_output();
    }
}
