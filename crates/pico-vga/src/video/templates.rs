//! Line templates
//!
//! Four constant segments cover every non-framebuffer part of the signal.
//! The vsync state of a line is chosen by which pair the chain points at.
//!
//! ```text
//! storage: [ hblank vsync on | hblank vsync off | pixels vsync on | pixels vsync off ]
//!            blank_words       blank_words        words_per_line    words_per_line
//!
//! hblank:  | front porch | hsync pulse | back porch |
//! pixels:  | black, hsync idle ...                  |
//! ```

#![allow(clippy::arithmetic_side_effects)] // offsets bounded by the geometry's word counts

use super::timing::SignalGeometry;

/// The four precomputed segments, carved out of caller-provided storage.
pub struct LineTemplates<'a> {
    words: &'a [u32],
    blank_words: usize,
    line_words: usize,
}

impl<'a> LineTemplates<'a> {
    /// Storage needed for `geometry`.
    pub const fn words_required(geometry: &SignalGeometry) -> usize {
        2 * geometry.blank_words() + 2 * geometry.words_per_line()
    }

    /// Fill `storage` with the templates. `None` if it is too short.
    pub fn build(geometry: &SignalGeometry, storage: &'a mut [u32]) -> Option<Self> {
        let blank_words = geometry.blank_words();
        let line_words = geometry.words_per_line();
        let storage = storage.get_mut(..Self::words_required(geometry))?;

        let (hblank, hpixels) = storage.split_at_mut(2 * blank_words);
        let (hblank_on, hblank_off) = hblank.split_at_mut(blank_words);
        let (hpixels_on, hpixels_off) = hpixels.split_at_mut(line_words);

        fill_hblank(geometry, hblank_on, true);
        fill_hblank(geometry, hblank_off, false);
        hpixels_on.fill(splat(geometry.sync_byte(false, true)));
        hpixels_off.fill(splat(geometry.sync_byte(false, false)));

        Some(Self {
            words: storage,
            blank_words,
            line_words,
        })
    }

    /// Horizontal blanking segment.
    pub fn hblank(&self, vsync: bool) -> &'a [u32] {
        let start = if vsync { 0 } else { self.blank_words };
        self.words.get(start..start + self.blank_words).unwrap_or_default()
    }

    /// Black active segment for lines outside the visible area.
    pub fn hpixels(&self, vsync: bool) -> &'a [u32] {
        let start = 2 * self.blank_words + if vsync { 0 } else { self.line_words };
        self.words.get(start..start + self.line_words).unwrap_or_default()
    }
}

/// Four copies of `byte` in one word.
pub(crate) const fn splat(byte: u8) -> u32 {
    u32::from_ne_bytes([byte; 4])
}

fn fill_hblank(geometry: &SignalGeometry, words: &mut [u32], vsync: bool) {
    let h = geometry.horizontal();
    let sync_start = usize::from(h.front_porch);
    let sync_end = sync_start + usize::from(h.sync_pulse);
    let byte_at = |i: usize| geometry.sync_byte((sync_start..sync_end).contains(&i), vsync);

    for (index, word) in words.iter_mut().enumerate() {
        let base = index * 4;
        // Memory order is output order: the PIO shifts the lowest address first.
        *word = u32::from_le_bytes([byte_at(base), byte_at(base + 1), byte_at(base + 2), byte_at(base + 3)]);
    }
}
