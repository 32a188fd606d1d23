//! Raspberry Pi Pico wiring
//!
//! Static video memory, volatile register access, the `DMA_IRQ_1` handler
//! and the two interrupt placements (core 0, or core 1 behind the startup
//! rendezvous).
//!
//! # Interrupt ownership
//!
//! embassy-rp binds `DMA_IRQ_0` for its async DMA driver and acknowledges
//! every channel routed there, so the scanout's data channel is moved to
//! `DMA_IRQ_1` (see `ScanoutChannels::setup_writes`) and serviced here.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{DMA_CH0, DMA_CH1, PIO0};
use platform::dma_safety::{
    is_dma_reachable, is_scanout_buffer, CHAIN_ENTRIES, CHAIN_SIZE_BYTES, FRAMEBUFFER_WORDS,
    TEMPLATE_WORDS,
};
use platform::{
    Descriptor, HandshakeError, IrqContext, RegisterBus, RegisterWrite, ScanoutChannels,
};
use static_cell::ConstStaticCell;

use super::{service_completion, IrqInstaller, Rp2040Scanout};
use crate::demo::Random;
use crate::video::{FrameCounter, SlotStore, VideoMemory};

// ── Shared with the interrupt ───────────────────────────────────────────────

/// Frames scanned out. Written only by `DMA_IRQ_1`.
pub static FRAME_COUNTER: FrameCounter = FrameCounter::new();

// Written once by `publish` before the interrupt is unmasked, then only
// read. A zero chain address means nothing has been published.
static CHAIN_ADDR: AtomicUsize = AtomicUsize::new(0);
static CHANNELS: AtomicU32 = AtomicU32::new(0);

#[interrupt]
fn DMA_IRQ_1() {
    if let Some(context) = published() {
        service_completion(&mut Mmio, &context, &FRAME_COUNTER);
    }
}

fn published() -> Option<IrqContext> {
    let chain_addr = CHAIN_ADDR.load(Ordering::Acquire);
    if chain_addr == 0 {
        return None;
    }
    let [control, data, state_machine, _] = CHANNELS.load(Ordering::Relaxed).to_le_bytes();
    Some(IrqContext {
        channels: ScanoutChannels {
            control,
            data,
            state_machine,
        },
        chain_addr,
    })
}

fn unmask_completion_irq() {
    interrupt::DMA_IRQ_1.set_priority(Priority::P0);
    // SAFETY: the handler only touches FRAME_COUNTER (single writer) and the
    // DMA registers of the scanout channels, which nothing else programs.
    unsafe { interrupt::DMA_IRQ_1.enable() };
}

fn publish(context: IrqContext) {
    let ScanoutChannels {
        control,
        data,
        state_machine,
    } = context.channels;
    CHANNELS.store(
        u32::from_le_bytes([control, data, state_machine, 0]),
        Ordering::Relaxed,
    );
    CHAIN_ADDR.store(context.chain_addr, Ordering::Release);
}

// ── Register access ─────────────────────────────────────────────────────────

/// Volatile stores to the RP2040 peripheral space.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mmio;

impl RegisterBus for Mmio {
    fn write(&mut self, write: RegisterWrite) {
        let register = write.addr as usize as *mut u32;
        // SAFETY: every RegisterWrite is built by `platform` from the RP2040
        // register map, so the address is an aligned, mapped peripheral
        // register.
        unsafe { core::ptr::write_volatile(register, write.value) };
    }
}

// ── Interrupt placement ─────────────────────────────────────────────────────

/// Service the end-of-frame interrupt on the calling core (core 0).
#[derive(Debug, Default)]
pub struct LocalIrq;

impl IrqInstaller for LocalIrq {
    fn install(&mut self, context: IrqContext) -> Result<(), HandshakeError> {
        publish(context);
        unmask_completion_irq();
        defmt::info!("end-of-frame interrupt on core 0");
        Ok(())
    }
}

#[cfg(feature = "multicore")]
pub use multicore::Core1Irq;

#[cfg(feature = "multicore")]
mod multicore {
    use embassy_rp::multicore::{spawn_core1, Stack};
    use embassy_rp::peripherals::CORE1;
    use embassy_time::Delay;
    use platform::{HandshakeError, IrqContext};
    use static_cell::ConstStaticCell;

    use super::{publish, unmask_completion_irq};
    use crate::hal::IrqInstaller;
    use crate::video::handshake::{Rendezvous, DEFAULT_POLL_BUDGET};

    const CORE1_STACK_BYTES: usize = 4096;

    static CORE1_STACK: ConstStaticCell<Stack<CORE1_STACK_BYTES>> =
        ConstStaticCell::new(Stack::new());
    static RENDEZVOUS: Rendezvous = Rendezvous::new();

    /// Service the end-of-frame interrupt on core 1.
    pub struct Core1Irq {
        core1: Option<CORE1>,
    }

    impl Core1Irq {
        /// Claim core 1.
        pub fn new(core1: CORE1) -> Self {
            Self { core1: Some(core1) }
        }
    }

    impl IrqInstaller for Core1Irq {
        fn install(&mut self, context: IrqContext) -> Result<(), HandshakeError> {
            let (Some(core1), Some(stack)) = (self.core1.take(), CORE1_STACK.try_take()) else {
                return Err(HandshakeError::Timeout);
            };
            publish(context);

            spawn_core1(core1, stack, move || {
                match RENDEZVOUS.secondary(&mut Delay, DEFAULT_POLL_BUDGET) {
                    Ok(()) => unmask_completion_irq(),
                    Err(err) => defmt::error!("core 1 handshake failed: {}", err),
                }
                loop {
                    cortex_m::asm::wfi();
                }
            });

            RENDEZVOUS.primary(&mut Delay, DEFAULT_POLL_BUDGET)?;
            defmt::info!("end-of-frame interrupt on core 1");
            Ok(())
        }
    }
}

// ── Video memory ────────────────────────────────────────────────────────────

struct StaticVideo {
    chain: [Descriptor; CHAIN_ENTRIES],
    templates: [u32; TEMPLATE_WORDS],
    framebuffers: [[u32; FRAMEBUFFER_WORDS]; 2],
}

static VIDEO: ConstStaticCell<StaticVideo> = ConstStaticCell::new(StaticVideo {
    chain: [Descriptor::TERMINATOR; CHAIN_ENTRIES],
    templates: [0; TEMPLATE_WORDS],
    framebuffers: [[0; FRAMEBUFFER_WORDS]; 2],
});

/// Hand out the static chain, templates and both framebuffers, once.
///
/// `None` on a second call, or if the linker placed anything outside
/// DMA-reachable SRAM.
pub fn claim_video_memory() -> Option<(VideoMemory<'static>, SlotStore<'static, 2>)> {
    let StaticVideo {
        chain,
        templates,
        framebuffers,
    } = VIDEO.try_take()?;
    let [front, back] = framebuffers;

    let placed = is_scanout_buffer(front.as_slice())
        && is_scanout_buffer(back.as_slice())
        && is_dma_reachable(chain.as_ptr() as usize, CHAIN_SIZE_BYTES);
    if !placed {
        defmt::error!("video memory is not DMA-reachable");
        return None;
    }

    let mut store = SlotStore::new();
    store.provide(front.as_mut_slice()).ok()?;
    store.provide(back.as_mut_slice()).ok()?;
    Some((
        VideoMemory {
            chain: chain.as_mut_slice(),
            templates: templates.as_mut_slice(),
        },
        store,
    ))
}

// ── Peripherals ─────────────────────────────────────────────────────────────

/// Peripherals the scanout drives through raw registers. Holding them keeps
/// embassy-rp drivers from claiming the same blocks.
pub struct ScanoutResources {
    /// Pixel state machine block.
    pub pio: PIO0,
    /// Descriptor-copying channel.
    pub control: DMA_CH0,
    /// Segment-streaming channel.
    pub data: DMA_CH1,
}

/// Scanout on the Pico's fixed resources.
pub struct PicoScanout<I: IrqInstaller> {
    inner: Rp2040Scanout<Mmio, I>,
    _resources: ScanoutResources,
}

impl<I: IrqInstaller> PicoScanout<I> {
    /// Bind the scanout to `resources`, with the interrupt placed by
    /// `installer`.
    pub fn new(resources: ScanoutResources, installer: I) -> Self {
        let sys_clock_hz = embassy_rp::clocks::clk_sys_freq();
        if sys_clock_hz != platform::config::SYS_CLOCK_HZ {
            defmt::warn!(
                "clk_sys is {=u32} Hz, not {=u32} Hz; the pixel clock will drift",
                sys_clock_hz,
                platform::config::SYS_CLOCK_HZ
            );
        }
        Self {
            inner: Rp2040Scanout::new(Mmio, installer, sys_clock_hz),
            _resources: resources,
        }
    }
}

impl<I: IrqInstaller> platform::ScanoutHardware for PicoScanout<I> {
    fn configure_output(&mut self, pin_base: u8, pixel_clock_hz: u32) {
        self.inner.configure_output(pin_base, pixel_clock_hz);
    }

    fn configure_chain(&mut self, chain_addr: usize) {
        self.inner.configure_chain(chain_addr);
    }

    fn enable_completion_irq(&mut self) -> Result<(), HandshakeError> {
        self.inner.enable_completion_irq()
    }

    fn start(&mut self) {
        self.inner.start();
    }

    fn stop_output(&mut self) {
        self.inner.stop_output();
    }
}

// ── Randomness ──────────────────────────────────────────────────────────────

const ROSC_RANDOMBIT: usize = 0x4006_001c;

/// The ring oscillator's random bit, sampled 32 times.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoscRandom;

impl Random for RoscRandom {
    fn next_u32(&mut self) -> u32 {
        let mut value = 0u32;
        for _ in 0..32 {
            // SAFETY: ROSC RANDOMBIT is a read-only status register; reading
            // it has no side effects.
            let bit = unsafe { core::ptr::read_volatile(ROSC_RANDOMBIT as *const u32) } & 1;
            value = (value << 1) | bit;
        }
        value
    }
}
