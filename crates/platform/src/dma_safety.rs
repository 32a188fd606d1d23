//! DMA placement rules and buffer sizing for the RP2040.
//!
//! ## DMA Accessibility on the RP2040
//!
//! | Memory Region  | Base Address | Size   | DMA | Use case |
//! |----------------|--------------|--------|-----|----------|
//! | Striped SRAM   | 0x2000_0000  | 256 KB | YES | Framebuffers, templates, descriptor chain |
//! | SRAM4          | 0x2004_0000  | 4 KB   | YES | Core 0 stack |
//! | SRAM5          | 0x2004_1000  | 4 KB   | YES | Core 1 stack |
//! | XIP flash      | 0x1000_0000  | 2 MB   | YES (cached, slow) | Sprite sheets, fonts |
//!
//! The scanout reads every active word once per line at the pixel clock, so
//! everything it touches must live in SRAM. Flash is reachable but an XIP
//! cache miss stalls far longer than the PIO FIFO can cover.
//!
//! ## Budget
//!
//! Two 320x240 framebuffers take 150 KB; the descriptor chain and four line
//! templates add about 9 KB. That leaves roughly 100 KB for the executor,
//! stacks and assets copied to RAM.

#![allow(clippy::arithmetic_side_effects)] // compile-time sizing math

// ── Memory region addresses ──────────────────────────────────────────────────

/// Base address of SRAM.
pub const SRAM_BASE: usize = 0x2000_0000;

/// Total SRAM in bytes (264 KB, all banks).
pub const SRAM_SIZE_BYTES: usize = 264 * 1024;

/// Base address of the XIP flash window.
pub const XIP_BASE: usize = 0x1000_0000;

// ── Video buffer constants ───────────────────────────────────────────────────

/// Framebuffer width in pixels.
pub const SCREEN_WIDTH: usize = 320;

/// Framebuffer height in pixels.
pub const SCREEN_HEIGHT: usize = 240;

/// Bytes of one framebuffer (one byte per pixel).
pub const FRAMEBUFFER_SIZE_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// 32-bit words of one framebuffer.
pub const FRAMEBUFFER_WORDS: usize = FRAMEBUFFER_SIZE_BYTES / 4;

/// Descriptor entries for a 525-line frame: two per scanline plus the terminator.
pub const CHAIN_ENTRIES: usize = 2 * 525 + 1;

/// Bytes of the descriptor chain on a 32-bit target.
pub const CHAIN_SIZE_BYTES: usize = CHAIN_ENTRIES * 8;

/// Words of the four line templates (two blanking, two pixel-segment).
pub const TEMPLATE_WORDS: usize = 2 * 20 + 2 * 80;

/// Everything the scanout keeps in SRAM with double buffering.
pub const VIDEO_SRAM_BYTES: usize =
    2 * FRAMEBUFFER_SIZE_BYTES + CHAIN_SIZE_BYTES + TEMPLATE_WORDS * 4;

/// Whether `len` bytes at `addr` sit entirely in SRAM.
pub fn is_dma_reachable(addr: usize, len: usize) -> bool {
    let Some(end) = addr.checked_add(len) else {
        return false;
    };
    addr >= SRAM_BASE && end <= SRAM_BASE + SRAM_SIZE_BYTES
}

/// Whether a word buffer is in SRAM and word aligned.
pub fn is_scanout_buffer(words: &[u32]) -> bool {
    let addr = words.as_ptr() as usize;
    addr % 4 == 0 && is_dma_reachable(addr, core::mem::size_of_val(words))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
