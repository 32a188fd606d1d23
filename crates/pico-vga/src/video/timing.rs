//! Signal geometry
//!
//! Pure description of one frame. Everything else (template sizes, chain
//! length, framebuffer size, sync byte values) is derived from here.
//!
//! Output byte layout, one byte per pixel clock:
//!
//! ```text
//!  bit  7     6     5  4   3  2   1  0
//!     VSYNC HSYNC  RED    GREEN   BLUE
//! ```

#![allow(clippy::arithmetic_side_effects)] // u16 timings widened to usize/u32 before any math

/// Level that asserts a sync pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPolarity {
    /// Pulse is high.
    Positive,
    /// Pulse is low.
    Negative,
}

impl SyncPolarity {
    /// Bit value of the sync line when the pulse is `asserted`.
    pub const fn level(self, asserted: bool) -> u8 {
        match self {
            Self::Positive => asserted as u8,
            Self::Negative => !asserted as u8,
        }
    }
}

/// One axis of the frame, in pixels (horizontal) or lines (vertical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Blanking before the sync pulse.
    pub front_porch: u16,
    /// Sync pulse width.
    pub sync_pulse: u16,
    /// Blanking after the sync pulse.
    pub back_porch: u16,
    /// Visible pixels or lines.
    pub active: u16,
    /// Sync pulse polarity.
    pub polarity: SyncPolarity,
}

impl Timing {
    /// Front porch + sync + back porch.
    pub const fn blanking(&self) -> usize {
        self.front_porch as usize + self.sync_pulse as usize + self.back_porch as usize
    }

    /// Blanking + active.
    pub const fn total(&self) -> usize {
        self.blanking() + self.active as usize
    }
}

/// Why a geometry cannot be scanned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// No visible pixels or lines.
    Empty,
    /// Vertical line divisor is zero.
    ZeroDivisor,
    /// Horizontal blanking or active width is not a whole number of words.
    Unaligned,
    /// Visible lines are not a multiple of the line divisor.
    UnevenDivisor,
}

/// Frame geometry: both axes, vertical line doubling and the pixel clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalGeometry {
    horizontal: Timing,
    vertical: Timing,
    line_divisor: u16,
    pixel_clock_hz: u32,
}

impl SignalGeometry {
    /// 640x480@60 timing with halved pixel clock (320 pixels per line) and
    /// every framebuffer line shown twice.
    pub const VGA_320X240: Self = Self {
        horizontal: Timing {
            front_porch: 8,
            sync_pulse: 48,
            back_porch: 24,
            active: 320,
            polarity: SyncPolarity::Negative,
        },
        vertical: Timing {
            front_porch: 10,
            sync_pulse: 2,
            back_porch: 33,
            active: 480,
            polarity: SyncPolarity::Negative,
        },
        line_divisor: 2,
        pixel_clock_hz: 12_588_000,
    };

    /// Validated geometry.
    pub const fn new(
        horizontal: Timing,
        vertical: Timing,
        line_divisor: u16,
        pixel_clock_hz: u32,
    ) -> Result<Self, GeometryError> {
        let geometry = Self {
            horizontal,
            vertical,
            line_divisor,
            pixel_clock_hz,
        };
        match geometry.validate() {
            Ok(()) => Ok(geometry),
            Err(err) => Err(err),
        }
    }

    const fn validate(&self) -> Result<(), GeometryError> {
        if self.horizontal.active == 0 || self.vertical.active == 0 {
            return Err(GeometryError::Empty);
        }
        if self.line_divisor == 0 {
            return Err(GeometryError::ZeroDivisor);
        }
        if self.horizontal.active % 4 != 0 || self.horizontal.blanking() % 4 != 0 {
            return Err(GeometryError::Unaligned);
        }
        if self.vertical.active % self.line_divisor != 0 {
            return Err(GeometryError::UnevenDivisor);
        }
        Ok(())
    }

    /// Horizontal timing.
    pub const fn horizontal(&self) -> &Timing {
        &self.horizontal
    }

    /// Vertical timing.
    pub const fn vertical(&self) -> &Timing {
        &self.vertical
    }

    /// Output lines per framebuffer line.
    pub const fn line_divisor(&self) -> usize {
        self.line_divisor as usize
    }

    /// Pixel clock the PIO is divided down to.
    pub const fn pixel_clock_hz(&self) -> u32 {
        self.pixel_clock_hz
    }

    /// Framebuffer width in pixels.
    pub const fn width(&self) -> usize {
        self.horizontal.active as usize
    }

    /// Framebuffer height in lines.
    pub const fn height(&self) -> usize {
        self.vertical.active as usize / self.line_divisor as usize
    }

    /// Words in one framebuffer line (4 pixels per word).
    pub const fn words_per_line(&self) -> usize {
        self.width() / 4
    }

    /// Words in the horizontal blanking segment.
    pub const fn blank_words(&self) -> usize {
        self.horizontal.blanking() / 4
    }

    /// Words in one framebuffer.
    pub const fn framebuffer_words(&self) -> usize {
        self.words_per_line() * self.height()
    }

    /// Output lines per frame, blanking included.
    pub const fn output_lines(&self) -> usize {
        self.vertical.total()
    }

    /// Descriptors in the chain: a (blanking, data) pair per output line
    /// plus the terminator.
    pub const fn descriptor_count(&self) -> usize {
        2 * self.output_lines() + 1
    }

    /// Output line at which the visible area starts. The chain begins with
    /// the vertical sync pulse, so the back porch precedes the active lines
    /// and the front porch closes the frame.
    pub const fn active_start(&self) -> usize {
        self.vertical.sync_pulse as usize + self.vertical.back_porch as usize
    }

    /// Output byte with the given sync pulses asserted and black color.
    pub const fn sync_byte(&self, hsync: bool, vsync: bool) -> u8 {
        (self.vertical.polarity.level(vsync) << 7) | (self.horizontal.polarity.level(hsync) << 6)
    }

    /// Idle sync pattern: neither pulse asserted.
    pub const fn sync_bits(&self) -> u8 {
        self.sync_byte(false, false)
    }

    /// Output byte for a 6-bit `color` outside the sync pulses.
    pub const fn pixel(&self, color: u8) -> u8 {
        self.sync_bits() | (color & 0x3f)
    }
}

const _: () = assert!(SignalGeometry::VGA_320X240.validate().is_ok());
