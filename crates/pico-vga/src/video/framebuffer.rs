//! Framebuffers and the drawable view of the back buffer
//!
//! A framebuffer is `width * height` pixel bytes stored as words, four
//! pixels per word, lowest address first (the order the PIO shifts them
//! out). Every byte is `sync_bits | color`.

#![allow(clippy::arithmetic_side_effects)] // coordinates checked against the screen first

use super::templates::splat;

/// Source of framebuffer memory for initialization.
pub trait FramebufferStore<'a> {
    /// Take a buffer of exactly `words` words.
    fn acquire(&mut self, words: usize) -> Option<&'a mut [u32]>;

    /// Give back a buffer obtained from [`acquire`](Self::acquire).
    fn release(&mut self, buffer: &'a mut [u32]);
}

/// Store handing out a fixed set of caller-provided buffers.
pub struct SlotStore<'a, const N: usize> {
    free: heapless::Vec<&'a mut [u32], N>,
}

impl<'a, const N: usize> SlotStore<'a, N> {
    /// Store with no buffers.
    pub const fn new() -> Self {
        Self {
            free: heapless::Vec::new(),
        }
    }

    /// Add a buffer. Returns it back if the store is full.
    pub fn provide(&mut self, buffer: &'a mut [u32]) -> Result<(), &'a mut [u32]> {
        self.free.push(buffer)
    }

    /// Buffers not handed out.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

impl<const N: usize> Default for SlotStore<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> FramebufferStore<'a> for SlotStore<'a, N> {
    fn acquire(&mut self, words: usize) -> Option<&'a mut [u32]> {
        let index = self.free.iter().position(|buffer| buffer.len() == words)?;
        Some(self.free.swap_remove(index))
    }

    fn release(&mut self, buffer: &'a mut [u32]) {
        // Only buffers taken from this store come back, so there is room.
        let _ = self.free.push(buffer);
    }
}

/// Screen geometry as seen by drawing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Screen {
    /// Width in pixels.
    pub width: usize,
    /// Height in lines.
    pub height: usize,
    /// Idle sync pattern merged into every pixel byte.
    pub sync_bits: u8,
}

impl Screen {
    /// Pixel byte for a 6-bit `color`.
    pub const fn pixel(&self, color: u8) -> u8 {
        self.sync_bits | (color & 0x3f)
    }

    /// Words per line.
    pub const fn words_per_line(&self) -> usize {
        self.width / 4
    }
}

/// Exclusive view of the buffer currently safe to draw into.
pub struct BackBuffer<'b> {
    words: &'b mut [u32],
    screen: Screen,
}

impl<'b> BackBuffer<'b> {
    /// View `words` as a `screen`-sized buffer.
    pub fn new(words: &'b mut [u32], screen: Screen) -> Self {
        Self { words, screen }
    }

    /// Screen geometry.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.screen.width
    }

    /// Height in lines.
    pub fn height(&self) -> usize {
        self.screen.height
    }

    /// Idle sync pattern.
    pub fn sync_bits(&self) -> u8 {
        self.screen.sync_bits
    }

    /// Packed words of line `y`.
    pub fn line(&self, y: usize) -> Option<&[u32]> {
        if y >= self.screen.height {
            return None;
        }
        let wpl = self.screen.words_per_line();
        self.words.get(y * wpl..(y + 1) * wpl)
    }

    /// Mutable packed words of line `y`.
    pub fn line_mut(&mut self, y: usize) -> Option<&mut [u32]> {
        if y >= self.screen.height {
            return None;
        }
        let wpl = self.screen.words_per_line();
        self.words.get_mut(y * wpl..(y + 1) * wpl)
    }

    /// Pixel bytes of line `y`, in output order.
    pub fn line_bytes(&self, y: usize) -> Option<&[u8]> {
        self.line(y).map(as_bytes)
    }

    /// Mutable pixel bytes of line `y`, in output order.
    pub fn line_bytes_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        self.line_mut(y).map(as_bytes_mut)
    }

    /// Pixel byte at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        self.line_bytes(y)?.get(x).copied()
    }

    /// Store a raw pixel byte at `(x, y)`; ignored outside the screen.
    pub fn set_pixel(&mut self, x: usize, y: usize, byte: u8) {
        if let Some(pixel) = self.line_bytes_mut(y).and_then(|line| line.get_mut(x)) {
            *pixel = byte;
        }
    }

    /// Fill with a 6-bit `color`, sync bits merged in.
    pub fn fill(&mut self, color: u8) {
        self.words.fill(splat(self.screen.pixel(color)));
    }

    /// All packed words.
    pub fn words(&self) -> &[u32] {
        self.words
    }
}

fn as_bytes(words: &[u32]) -> &[u8] {
    // SAFETY: u8 has no alignment requirement and every bit pattern is valid;
    // the byte slice covers exactly the memory of `words` and shares its lifetime.
    unsafe { core::slice::from_raw_parts(words.as_ptr().cast::<u8>(), core::mem::size_of_val(words)) }
}

fn as_bytes_mut(words: &mut [u32]) -> &mut [u8] {
    // SAFETY: as in `as_bytes`; the exclusive borrow of `words` moves into the result.
    unsafe {
        core::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), core::mem::size_of_val(words))
    }
}
