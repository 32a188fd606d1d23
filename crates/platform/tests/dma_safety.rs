//! Architecture tests: SRAM budget for the scanout buffers.
//! These tests pin the sizing constants the firmware's static allocation relies on.

// Test files legitimately use arithmetic for verification; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
// Some assertions check documented compile-time constants for architectural correctness.
#![allow(clippy::assertions_on_constants)]

use platform::dma_safety::{
    CHAIN_ENTRIES, FRAMEBUFFER_SIZE_BYTES, FRAMEBUFFER_WORDS, SCREEN_HEIGHT, SCREEN_WIDTH,
    SRAM_SIZE_BYTES, TEMPLATE_WORDS, VIDEO_SRAM_BYTES,
};

// Test 1: one byte per pixel
#[test]
fn framebuffer_size_matches_dimensions() {
    assert_eq!(FRAMEBUFFER_SIZE_BYTES, SCREEN_WIDTH * SCREEN_HEIGHT);
    assert_eq!(FRAMEBUFFER_WORDS * 4, FRAMEBUFFER_SIZE_BYTES);
}

// Test 2: width packs evenly into words
#[test]
fn lines_are_whole_words() {
    assert_eq!(SCREEN_WIDTH % 4, 0, "scanout segments are whole words");
}

// Test 3: double buffering fits with room for the executor and stacks
#[test]
fn double_buffered_video_fits_in_sram() {
    assert!(
        VIDEO_SRAM_BYTES + 64 * 1024 < SRAM_SIZE_BYTES,
        "video buffers ({VIDEO_SRAM_BYTES} B) leave less than 64 KB of SRAM"
    );
}

// Test 4: chain has one pair per output line plus the terminator
#[test]
fn chain_entries_cover_full_frame() {
    assert_eq!(CHAIN_ENTRIES, 1051);
    assert_eq!(CHAIN_ENTRIES % 2, 1, "terminator makes the count odd");
}

// Test 5: templates hold two blanking lines and two pixel-segment lines
#[test]
fn template_words_cover_both_vsync_states() {
    // 80 horizontal blanking pixels / 4 = 20 words, 320 / 4 = 80 words.
    assert_eq!(TEMPLATE_WORDS, 2 * 20 + 2 * 80);
}
