//! Packed-pixel sprite compositor
//!
//! Sprites and framebuffers both hold four pixels per word, so a sprite at
//! `x` lands on destination words with one of four alignment phases
//! `p = x mod 4`. Each destination word is filled from the two source words
//! straddling it:
//!
//! ```text
//! p = 0   block = cur
//! p > 0   block = (old >> (32 - 8p)) | (cur << 8p)
//! ```
//!
//! and merged under a byte mask, `(dest & !mask) | (block & mask)`. The mask
//! clips the first and last word of a line to the visible columns and, for
//! transparent draws, drops every byte of the block that holds the
//! transparency sentinel.

#![allow(clippy::arithmetic_side_effects)] // clip math in i64, indices bounded by the clip rectangle

use super::sprite::Sprite;
use crate::video::BackBuffer;

/// Low six bits of a transparent pixel. Sync bits are ignored.
pub const TRANSPARENT: u8 = 0x0c;

const COLOR_BITS: u8 = 0x3f;

/// Alignment of the sprite's left edge within a destination word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Aligned,
    Shift1,
    Shift2,
    Shift3,
}

impl Phase {
    fn of(x: i64) -> Self {
        match x.rem_euclid(4) {
            0 => Self::Aligned,
            1 => Self::Shift1,
            2 => Self::Shift2,
            _ => Self::Shift3,
        }
    }

    /// Destination-aligned block from the source words around it.
    fn block(self, old: u32, cur: u32) -> u32 {
        match self {
            Self::Aligned => cur,
            Self::Shift1 => (old >> 24) | (cur << 8),
            Self::Shift2 => (old >> 16) | (cur << 16),
            Self::Shift3 => (old >> 8) | (cur << 24),
        }
    }
}

/// Byte mask of the pixels in `block` that are not the sentinel.
pub fn opaque_mask(block: u32) -> u32 {
    let mut mask = 0;
    for (lane, byte) in block.to_le_bytes().into_iter().enumerate() {
        if byte & COLOR_BITS != TRANSPARENT {
            mask |= 0xff << (8 * lane);
        }
    }
    mask
}

/// Mask covering the lowest `bytes` bytes (`0..=4`).
fn low_bytes(bytes: i64) -> u32 {
    match bytes {
        i64::MIN..=0 => 0,
        1 => 0x0000_00ff,
        2 => 0x0000_ffff,
        3 => 0x00ff_ffff,
        _ => 0xffff_ffff,
    }
}

impl BackBuffer<'_> {
    /// Composite `sprite` with its top-left at `(x, y)`, clipped to the screen.
    ///
    /// With `transparent`, pixels whose color is [`TRANSPARENT`] leave the
    /// destination untouched. Off-screen sprites and sprites with no pixels
    /// draw nothing.
    pub fn draw_sprite(&mut self, sprite: &Sprite<'_>, x: i32, y: i32, transparent: bool) {
        let stride_pixels = i64::try_from(sprite.stride()).unwrap_or(0).saturating_mul(4);
        let width = i64::from(sprite.width()).min(stride_pixels);
        let height = i64::from(sprite.height())
            .min(i64::try_from(sprite.rows_available()).unwrap_or(i64::MAX));
        if width <= 0 || height <= 0 {
            return;
        }

        let (x, y) = (i64::from(x), i64::from(y));
        let screen_w = i64::try_from(self.width()).unwrap_or(0);
        let screen_h = i64::try_from(self.height()).unwrap_or(0);
        let x0 = x.max(0);
        let x1 = (x + width).min(screen_w);
        let y0 = y.max(0);
        let y1 = (y + height).min(screen_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let phase = Phase::of(x);
        let q = x.div_euclid(4);
        let first_word = x0 / 4;
        let last_word = (x1 - 1) / 4;

        for dy in y0..y1 {
            let (Ok(src_row), Ok(dst_row)) = (usize::try_from(dy - y), usize::try_from(dy)) else {
                continue;
            };
            let (Some(src), Some(dst)) = (sprite.row(src_row), self.line_mut(dst_row)) else {
                continue;
            };
            let fetch = |j: i64| {
                usize::try_from(j).ok().and_then(|j| src.get(j)).copied().unwrap_or(0)
            };

            for k in first_word..=last_word {
                let j = k - q;
                let block = phase.block(fetch(j - 1), fetch(j));
                let edge = 4 * k;
                let mut mask = low_bytes(x1 - edge) & !low_bytes(x0 - edge);
                if transparent {
                    mask &= opaque_mask(block);
                }
                let Some(word) = usize::try_from(k).ok().and_then(|k| dst.get_mut(k)) else {
                    continue;
                };
                *word = (*word & !mask) | (block & mask);
            }
        }
    }
}
