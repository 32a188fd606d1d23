//! Bitmap text on the back buffer
//!
//! A [`TextRenderer`] keeps a cursor, a color and an alignment between
//! calls, so a line of text can be built from several pieces:
//!
//! ```
//! use pico_vga::{Alignment, TextRenderer, FONT_6X8};
//! use pico_vga::video::{BackBuffer, Screen};
//!
//! let mut words = [0u32; 320 * 16 / 4];
//! let screen = Screen { width: 320, height: 16, sync_bits: 0xc0 };
//! let mut buffer = BackBuffer::new(&mut words, screen);
//!
//! let mut text = TextRenderer::new(FONT_6X8);
//! text.set_color(0x3f);
//! text.move_to(10, 4);
//! text.draw_uint(&mut buffer, 60);
//! text.draw_text(&mut buffer, " fps");
//! assert_eq!(text.position(), (10 + 6 * 6, 4));
//! ```
//!
//! Only per-line byte access and the screen size of [`BackBuffer`] are used.

mod font;

use core::fmt::{self, Write};

use crate::video::BackBuffer;

pub use font::FONT_6X8;

/// Formatted text longer than this is cut.
pub const PRINT_CAPACITY: usize = 32;

/// Monospace bitmap font.
///
/// Glyph `c` occupies `height` bytes starting at `height * (c - first_char)`,
/// one byte per row, bit 0 being the leftmost pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font<'a> {
    /// Advance and drawn width in pixels (at most 8).
    pub width: i32,
    /// Rows per glyph.
    pub height: i32,
    /// First character in the table.
    pub first_char: u8,
    /// Characters in the table.
    pub num_chars: u16,
    /// Glyph rows.
    pub data: &'a [u8],
}

impl<'a> Font<'a> {
    /// Rows of the glyph for `ch`, if the table has it.
    pub fn glyph(&self, ch: u8) -> Option<&'a [u8]> {
        let index = usize::from(ch.checked_sub(self.first_char)?);
        if index >= usize::from(self.num_chars) {
            return None;
        }
        let height = usize::try_from(self.height).ok()?;
        let start = index.checked_mul(height)?;
        self.data.get(start..start.checked_add(height)?)
    }
}

/// Where the cursor sits relative to the drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    /// Text starts at the cursor.
    #[default]
    Left,
    /// Text is centered on the cursor.
    Center,
    /// Text ends at the cursor.
    Right,
}

/// Cursor-based text drawing.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'f> {
    font: Font<'f>,
    color: u8,
    x: i32,
    y: i32,
    alignment: Alignment,
}

impl<'f> TextRenderer<'f> {
    /// Black, left-aligned text at the origin.
    pub const fn new(font: Font<'f>) -> Self {
        Self {
            font,
            color: 0,
            x: 0,
            y: 0,
            alignment: Alignment::Left,
        }
    }

    /// Switch fonts.
    pub fn set_font(&mut self, font: Font<'f>) {
        self.font = font;
    }

    /// Set the 6-bit text color.
    pub fn set_color(&mut self, color: u8) {
        self.color = color & 0x3f;
    }

    /// Move the cursor.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Set the alignment for following text.
    pub fn align(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    /// Cursor position.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Draw `text` at the cursor.
    ///
    /// Left and centered text move the cursor past the text. Right-aligned
    /// text leaves the cursor at its left edge. Bytes the font lacks take up
    /// space but draw nothing.
    pub fn draw_text(&mut self, target: &mut BackBuffer<'_>, text: &str) {
        let advance = self.font.width;
        let len = i32::try_from(text.len()).unwrap_or(i32::MAX);
        match self.alignment {
            Alignment::Left => {}
            Alignment::Center => {
                self.x = self.x.saturating_sub(len.saturating_mul(advance).div_euclid(2));
            }
            Alignment::Right => self.x = self.x.saturating_sub(len.saturating_mul(advance)),
        }

        let start = self.x;
        let pixel = target.sync_bits() | self.color;
        for ch in text.bytes() {
            if let Some(glyph) = self.font.glyph(ch) {
                self.draw_glyph(target, glyph, pixel);
            }
            self.x = self.x.saturating_add(advance);
        }

        if self.alignment == Alignment::Right {
            self.x = start;
        }
    }

    fn draw_glyph(&self, target: &mut BackBuffer<'_>, glyph: &[u8], pixel: u8) {
        let columns = u32::try_from(self.font.width.clamp(0, 8)).unwrap_or(0);
        for (dy, &bits) in (0i32..).zip(glyph) {
            let Some(y) = self.y.checked_add(dy).and_then(|y| usize::try_from(y).ok()) else {
                continue;
            };
            for dx in 0..columns {
                if bits.checked_shr(dx).unwrap_or(0) & 1 == 0 {
                    continue;
                }
                let x = self.x.checked_add_unsigned(dx);
                if let Some(x) = x.and_then(|x| usize::try_from(x).ok()) {
                    target.set_pixel(x, y, pixel);
                }
            }
        }
    }

    /// Draw formatted text, cut at [`PRINT_CAPACITY`] bytes.
    pub fn print(&mut self, target: &mut BackBuffer<'_>, args: fmt::Arguments<'_>) {
        let mut line = Truncating(heapless::String::new());
        // Overflow only truncates.
        let _ = line.write_fmt(args);
        self.draw_text(target, &line.0);
    }

    /// Draw a signed integer.
    pub fn draw_int(&mut self, target: &mut BackBuffer<'_>, value: i32) {
        self.print(target, format_args!("{value}"));
    }

    /// Draw an unsigned integer.
    pub fn draw_uint(&mut self, target: &mut BackBuffer<'_>, value: u32) {
        self.print(target, format_args!("{value}"));
    }

    /// Draw a float with six decimals.
    pub fn draw_float(&mut self, target: &mut BackBuffer<'_>, value: f32) {
        self.print(target, format_args!("{value:.6}"));
    }

    /// Draw `text` at `(x, y)` with a one-pixel border around every glyph.
    ///
    /// The border is eight offset copies in `border_color`, then the text
    /// itself in `text_color`. The renderer's color ends up as `text_color`.
    pub fn draw_outlined(
        &mut self,
        target: &mut BackBuffer<'_>,
        x: i32,
        y: i32,
        text_color: u8,
        border_color: u8,
        text: &str,
    ) {
        self.set_color(border_color);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx != 0 || dy != 0 {
                    self.move_to(x.saturating_add(dx), y.saturating_add(dy));
                    self.draw_text(target, text);
                }
            }
        }
        self.set_color(text_color);
        self.move_to(x, y);
        self.draw_text(target, text);
    }
}

/// Keeps as much of the output as fits.
struct Truncating(heapless::String<PRINT_CAPACITY>);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            self.0.push(ch).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}
