//! Descriptor chain
//!
//! One `(blanking, data)` descriptor pair per output line, in scan order,
//! followed by the `(0, null)` terminator:
//!
//! ```text
//! line 0 .. sync            hblank(vsync)  hpixels(vsync)
//! .. + back porch           hblank         hpixels
//! .. + active               hblank         framebuffer[(line - active_start) / divisor]
//! .. + front porch          hblank         hpixels
//!                           terminator
//! ```
//!
//! Only the data entries of active lines are ever rewritten after layout.
//! The terminator raises the end-of-frame interrupt at the end of the front
//! porch, so the repointing done by a waiting swap lands during the sync
//! pulse and back porch of the next frame, before any active line is read.

#![allow(clippy::arithmetic_side_effects)] // indices bounded by descriptor_count()

use core::sync::atomic::{compiler_fence, Ordering};

use platform::Descriptor;

use super::templates::LineTemplates;
use super::timing::SignalGeometry;

/// Laid-out chain over caller-provided descriptor storage.
pub struct DescriptorChain<'a> {
    entries: &'a mut [Descriptor],
    geometry: SignalGeometry,
}

impl<'a> DescriptorChain<'a> {
    /// Lay out a full frame with the active lines reading `front`.
    ///
    /// `None` if `entries` or `front` is shorter than the geometry needs.
    pub fn layout(
        geometry: SignalGeometry,
        entries: &'a mut [Descriptor],
        templates: &LineTemplates<'_>,
        front: &[u32],
    ) -> Option<Self> {
        let entries = entries.get_mut(..geometry.descriptor_count())?;
        if front.len() < geometry.framebuffer_words() {
            return None;
        }

        let v = geometry.vertical();
        let sync_end = usize::from(v.sync_pulse);
        let active = geometry.active_start()..geometry.active_start() + usize::from(v.active);

        let (lines, terminator) = entries.split_at_mut(2 * geometry.output_lines());
        for (line, pair) in lines.chunks_exact_mut(2).enumerate() {
            let vsync = line < sync_end;
            let data = if active.contains(&line) {
                let row = (line - active.start) / geometry.line_divisor();
                framebuffer_line(&geometry, front, row)
            } else {
                templates.hpixels(vsync)
            };
            if let [blank, pixels] = pair {
                *blank = Descriptor::for_words(templates.hblank(vsync));
                *pixels = Descriptor::for_words(data);
            }
        }
        terminator.fill(Descriptor::TERMINATOR);

        Some(Self { entries, geometry })
    }

    /// Repoint every active line's data descriptor at `framebuffer`.
    ///
    /// Blanking descriptors and the terminator are left untouched.
    pub fn present(&mut self, framebuffer: &[u32]) {
        let geometry = self.geometry;
        let rows = framebuffer
            .chunks_exact(geometry.words_per_line())
            .take(geometry.height())
            .flat_map(|row| core::iter::repeat(row).take(geometry.line_divisor()));
        let active_data = self
            .entries
            .iter_mut()
            .skip(2 * geometry.active_start() + 1)
            .step_by(2)
            .take(usize::from(geometry.vertical().active));
        for (entry, row) in active_data.zip(rows) {
            *entry = Descriptor::for_words(row);
        }
        // The DMA reads the chain behind the compiler's back.
        compiler_fence(Ordering::SeqCst);
    }

    /// All entries, terminator included.
    pub fn entries(&self) -> &[Descriptor] {
        self.entries
    }

    /// Number of entries, terminator included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain has no entries (never true once laid out).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Address the control channel starts reading from.
    pub fn start_address(&self) -> usize {
        self.entries.as_ptr() as usize
    }

    /// Index of the data descriptor of output line `line`.
    pub const fn data_index(line: usize) -> usize {
        2 * line + 1
    }
}

fn framebuffer_line<'f>(geometry: &SignalGeometry, front: &'f [u32], row: usize) -> &'f [u32] {
    let words = geometry.words_per_line();
    front.get(row * words..(row + 1) * words).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VGA: SignalGeometry = SignalGeometry::VGA_320X240;

    struct Memory {
        templates: Vec<u32>,
        entries: Vec<Descriptor>,
        front: Vec<u32>,
    }

    fn memory() -> Memory {
        Memory {
            templates: vec![0; LineTemplates::words_required(&VGA)],
            entries: vec![Descriptor::TERMINATOR; VGA.descriptor_count()],
            front: vec![0; VGA.framebuffer_words()],
        }
    }

    #[test]
    fn layout_covers_the_frame() {
        let mut mem = memory();
        let templates = LineTemplates::build(&VGA, &mut mem.templates).unwrap();
        let chain = DescriptorChain::layout(VGA, &mut mem.entries, &templates, &mem.front).unwrap();
        assert_eq!(chain.len(), 1051);
        let entries = chain.entries();

        // Vsync lines use the vsync-on templates.
        assert_eq!(entries[0], Descriptor::for_words(templates.hblank(true)));
        assert_eq!(entries[3], Descriptor::for_words(templates.hpixels(true)));
        // Back porch, then the first active line reads framebuffer row 0 twice.
        assert_eq!(entries[4], Descriptor::for_words(templates.hblank(false)));
        assert_eq!(entries[71], Descriptor::for_words(&mem.front[..80]));
        assert_eq!(entries[73], Descriptor::for_words(&mem.front[..80]));
        assert_eq!(entries[75], Descriptor::for_words(&mem.front[80..160]));
        // Last active line reads row 239; front porch after it.
        assert_eq!(entries[2 * 514 + 1], Descriptor::for_words(&mem.front[239 * 80..]));
        assert_eq!(entries[2 * 515 + 1], Descriptor::for_words(templates.hpixels(false)));
        assert!(entries[1050].is_terminator());
    }

    #[test]
    fn every_segment_has_the_expected_length() {
        let mut mem = memory();
        let templates = LineTemplates::build(&VGA, &mut mem.templates).unwrap();
        let chain = DescriptorChain::layout(VGA, &mut mem.entries, &templates, &mem.front).unwrap();
        for pair in chain.entries()[..1050].chunks_exact(2) {
            assert_eq!(pair[0].count, 20);
            assert_eq!(pair[1].count, 80);
        }
    }

    #[test]
    fn present_only_touches_active_data_entries() {
        let mut mem = memory();
        let back = vec![0u32; VGA.framebuffer_words()];
        let templates = LineTemplates::build(&VGA, &mut mem.templates).unwrap();
        let mut chain =
            DescriptorChain::layout(VGA, &mut mem.entries, &templates, &mem.front).unwrap();
        let before = chain.entries().to_vec();
        chain.present(&back);
        let after = chain.entries();

        for (index, (old, new)) in before.iter().zip(after).enumerate() {
            let line = index / 2;
            let active_data = index % 2 == 1 && (35..515).contains(&line);
            if active_data {
                let row = (line - 35) / 2;
                assert_eq!(*new, Descriptor::for_words(&back[row * 80..(row + 1) * 80]));
            } else {
                assert_eq!(old, new, "entry {index} must not change");
            }
        }
    }

    #[test]
    fn short_storage_is_rejected() {
        let mut mem = memory();
        let templates = LineTemplates::build(&VGA, &mut mem.templates).unwrap();
        let mut short = vec![Descriptor::TERMINATOR; 1050];
        assert!(DescriptorChain::layout(VGA, &mut short, &templates, &mem.front).is_none());
        assert!(DescriptorChain::layout(VGA, &mut mem.entries, &templates, &mem.front[1..]).is_none());
    }
}
