//! The video engine
//!
//! [`Vga`] owns the scanout hardware, the descriptor chain and both
//! framebuffers. It exists only after [`Vga::initialize`] has started the
//! chain, so every method on it is infallible.

use core::mem;

use platform::{Descriptor, ScanoutHardware};

use super::chain::DescriptorChain;
use super::frame::FrameCounter;
use super::framebuffer::{BackBuffer, FramebufferStore, Screen};
use super::templates::LineTemplates;
use super::timing::SignalGeometry;
use crate::draw::Sprite;
use crate::error::VgaError;

/// Storage for the parts of the signal that are not framebuffers.
pub struct VideoMemory<'a> {
    /// Descriptor chain, at least `descriptor_count()` entries.
    pub chain: &'a mut [Descriptor],
    /// Line templates, at least `LineTemplates::words_required()` words.
    pub templates: &'a mut [u32],
}

/// Running VGA output with a drawable back buffer.
pub struct Vga<'a, H: ScanoutHardware> {
    hardware: H,
    geometry: SignalGeometry,
    chain: DescriptorChain<'a>,
    front: &'a mut [u32],
    back: &'a mut [u32],
    frames: &'a FrameCounter,
}

impl<'a, H: ScanoutHardware> Vga<'a, H> {
    /// Build the signal and start scanning out.
    ///
    /// Both framebuffers come from `store` and start out black. On failure
    /// every buffer already taken is handed back and nothing is streamed; a
    /// failed interrupt handshake also stops the output again.
    pub fn initialize<S>(
        mut hardware: H,
        geometry: SignalGeometry,
        memory: VideoMemory<'a>,
        store: &mut S,
        frames: &'a FrameCounter,
        pin_base: u8,
    ) -> Result<Self, VgaError>
    where
        S: FramebufferStore<'a>,
    {
        let templates =
            LineTemplates::build(&geometry, memory.templates).ok_or(VgaError::Allocation)?;

        let words = geometry.framebuffer_words();
        let front = store.acquire(words).ok_or(VgaError::Allocation)?;
        let Some(back) = store.acquire(words) else {
            store.release(front);
            return Err(VgaError::Allocation);
        };

        let screen = screen_of(&geometry);
        BackBuffer::new(&mut *front, screen).fill(0);
        BackBuffer::new(&mut *back, screen).fill(0);

        let chain = DescriptorChain::layout(geometry, memory.chain, &templates, &*front);
        let Some(chain) = chain else {
            store.release(front);
            store.release(back);
            return Err(VgaError::Allocation);
        };

        hardware.configure_output(pin_base, geometry.pixel_clock_hz());
        hardware.configure_chain(chain.start_address());
        if let Err(err) = hardware.enable_completion_irq() {
            #[cfg(feature = "defmt")]
            defmt::error!("completion interrupt not installed: {}", err);
            hardware.stop_output();
            store.release(front);
            store.release(back);
            return Err(VgaError::Coordination(err));
        }
        hardware.start();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "VGA {}x{} started, {} descriptors at {=usize:#x}",
            geometry.width(),
            geometry.height(),
            chain.len(),
            chain.start_address()
        );

        Ok(Self {
            hardware,
            geometry,
            chain,
            front,
            back,
            frames,
        })
    }

    /// Present the back buffer and start drawing into the other one.
    ///
    /// With `wait_for_vsync` the descriptors are repointed only after the
    /// next end-of-frame interrupt, i.e. while vertical blanking is being
    /// scanned out. Without it the switch may tear.
    pub fn swap(&mut self, wait_for_vsync: bool) {
        if wait_for_vsync {
            self.frames.wait_for_next(self.frames.now());
        }
        self.flip();
    }

    /// [`swap`](Self::swap), yielding to the executor while waiting.
    pub async fn swap_async(&mut self, wait_for_vsync: bool) {
        if wait_for_vsync {
            self.frames.next(self.frames.now()).await;
        }
        self.flip();
    }

    fn flip(&mut self) {
        self.chain.present(&*self.back);
        mem::swap(&mut self.front, &mut self.back);
    }

    /// Screen geometry for drawing code.
    pub fn screen(&self) -> Screen {
        screen_of(&self.geometry)
    }

    /// The buffer that is not being scanned out.
    pub fn back_buffer(&mut self) -> BackBuffer<'_> {
        BackBuffer::new(&mut *self.back, screen_of(&self.geometry))
    }

    /// Fill the back buffer with a 6-bit `color`.
    pub fn clear(&mut self, color: u8) {
        self.back_buffer().fill(color);
    }

    /// Composite `sprite` into the back buffer with its top-left at `(x, y)`.
    pub fn draw(&mut self, sprite: &Sprite<'_>, x: i32, y: i32, transparent: bool) {
        self.back_buffer().draw_sprite(sprite, x, y, transparent);
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u32 {
        self.frames.now()
    }

    /// Signal geometry in use.
    pub fn geometry(&self) -> &SignalGeometry {
        &self.geometry
    }

    /// The live descriptor chain.
    pub fn chain(&self) -> &DescriptorChain<'a> {
        &self.chain
    }

    /// Scanout hardware.
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Address of the buffer being scanned out.
    pub fn front_address(&self) -> usize {
        self.front.as_ptr() as usize
    }

    /// Address of the buffer being drawn into.
    pub fn back_address(&self) -> usize {
        self.back.as_ptr() as usize
    }
}

fn screen_of(geometry: &SignalGeometry) -> Screen {
    Screen {
        width: geometry.width(),
        height: geometry.height(),
        sync_bits: geometry.sync_bits(),
    }
}
