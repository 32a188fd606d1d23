//! RP2040 scanout binding
//!
//! [`Rp2040Scanout`] turns the engine's [`ScanoutHardware`] calls into the
//! register batches computed by `platform`, applied through any
//! [`RegisterBus`]. On the chip the bus is volatile MMIO
//! ([`board::Mmio`]); in tests it is [`platform::mocks::MockRegisters`].
//!
//! Where the end-of-frame interrupt runs is decided by an [`IrqInstaller`]:
//! core 0 directly, or core 1 after the startup rendezvous.

#[cfg(feature = "hardware")]
pub mod board;

use platform::config::VGA_PIN_COUNT;
use platform::{
    ClockDivider, HandshakeError, IrqContext, PixelProgram, RegisterBus, ScanoutChannels,
    ScanoutHardware,
};

use crate::video::FrameCounter;

/// Installs the end-of-frame interrupt handler for a chain.
pub trait IrqInstaller {
    /// Make `context` available to the handler and unmask the interrupt.
    fn install(&mut self, context: IrqContext) -> Result<(), HandshakeError>;
}

impl<T: IrqInstaller + ?Sized> IrqInstaller for &mut T {
    fn install(&mut self, context: IrqContext) -> Result<(), HandshakeError> {
        (**self).install(context)
    }
}

/// PIO0 + two DMA channels driven through a register bus.
pub struct Rp2040Scanout<B, I> {
    bus: B,
    installer: I,
    channels: ScanoutChannels,
    program: PixelProgram,
    sys_clock_hz: u32,
    pin_base: u8,
    chain_addr: usize,
}

impl<B: RegisterBus, I: IrqInstaller> Rp2040Scanout<B, I> {
    /// Scanout on the default channels with `clk_sys` at `sys_clock_hz`.
    pub fn new(bus: B, installer: I, sys_clock_hz: u32) -> Self {
        Self {
            bus,
            installer,
            channels: ScanoutChannels::DEFAULT,
            program: PixelProgram::AT_ORIGIN,
            sys_clock_hz,
            pin_base: 0,
            chain_addr: 0,
        }
    }

    /// Channels and state machine in use.
    pub fn channels(&self) -> ScanoutChannels {
        self.channels
    }

    /// The register bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: RegisterBus, I: IrqInstaller> ScanoutHardware for Rp2040Scanout<B, I> {
    fn configure_output(&mut self, pin_base: u8, pixel_clock_hz: u32) {
        let divider = ClockDivider::nearest(self.sys_clock_hz, pixel_clock_hz);
        #[cfg(feature = "defmt")]
        defmt::info!(
            "pixel clock {=u32} Hz requested, divider {=u16} gives {=u32} Hz",
            pixel_clock_hz,
            divider.integer_part(),
            divider.output_hz(self.sys_clock_hz)
        );
        self.pin_base = pin_base;
        let writes = self.program.setup_writes(
            self.channels.state_machine,
            pin_base,
            VGA_PIN_COUNT,
            divider,
        );
        self.bus.apply(&writes);
    }

    fn configure_chain(&mut self, chain_addr: usize) {
        self.chain_addr = chain_addr;
        self.bus.apply(&self.channels.setup_writes(chain_addr));
    }

    fn enable_completion_irq(&mut self) -> Result<(), HandshakeError> {
        self.installer.install(IrqContext {
            channels: self.channels,
            chain_addr: self.chain_addr,
        })
    }

    fn start(&mut self) {
        self.bus.write(self.channels.start_write());
    }

    fn stop_output(&mut self) {
        let writes =
            PixelProgram::stop_writes(self.channels.state_machine, self.pin_base, VGA_PIN_COUNT);
        self.bus.apply(&writes);
    }
}

/// End-of-frame interrupt body: acknowledge, restart the chain, count.
pub fn service_completion<B: RegisterBus>(
    bus: &mut B,
    context: &IrqContext,
    frames: &FrameCounter,
) {
    bus.write(context.channels.acknowledge_write());
    bus.write(context.channels.rearm_write(context.chain_addr));
    frames.increment();
}
