//! PIO clock divider for the pixel clock.
//!
//! The pixel state machine emits one byte per PIO cycle, so the state
//! machine clock *is* the pixel clock. The RP2040 divides `clk_sys` by a
//! 16.8 fixed-point value per state machine.
//!
//! With the default `clk_sys` of 125 MHz and the 640x480 pixel clock halved
//! for 320-pixel lines (12.588 MHz), the nearest integer divider is 10,
//! giving 12.5 MHz. Monitors tolerate that 0.7 % error; an integer divider
//! keeps every pixel the same width, which a fractional divider would not.
//!
//! # Sources
//!
//! - RP2040 datasheet, section 3.7 (`SMx_CLKDIV`: INT bits 31:16, FRAC 15:8)

#![allow(clippy::arithmetic_side_effects)] // u64 intermediate, results clamped to field widths

/// Largest integer part of `SMx_CLKDIV` (0 encodes 65536 and is avoided).
pub const MAX_INTEGER: u16 = u16::MAX;

/// Fixed-point 16.8 state machine clock divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider {
    integer: u16,
    fraction: u8,
}

impl ClockDivider {
    /// Integer divider, clamped to `1..=65535`.
    pub const fn integer(value: u16) -> Self {
        let integer = if value == 0 { 1 } else { value };
        Self {
            integer,
            fraction: 0,
        }
    }

    /// Nearest integer divider that brings `sys_hz` to `pixel_hz`.
    ///
    /// A zero `pixel_hz` selects the slowest divider.
    pub fn nearest(sys_hz: u32, pixel_hz: u32) -> Self {
        if pixel_hz == 0 {
            return Self::integer(MAX_INTEGER);
        }
        let sys = u64::from(sys_hz);
        let pixel = u64::from(pixel_hz);
        let rounded = (sys + pixel / 2) / pixel;
        Self::integer(u16::try_from(rounded).unwrap_or(MAX_INTEGER))
    }

    /// Closest 16.8 fixed-point divider, fraction included.
    #[allow(clippy::cast_possible_truncation)] // masked to 8 bits
    pub fn exact(sys_hz: u32, pixel_hz: u32) -> Self {
        if pixel_hz == 0 {
            return Self::integer(MAX_INTEGER);
        }
        let pixel = u64::from(pixel_hz);
        let scaled = (u64::from(sys_hz) * 256 + pixel / 2) / pixel;
        let integer = scaled >> 8;
        if integer == 0 {
            return Self::integer(1);
        }
        match u16::try_from(integer) {
            Ok(integer) => Self {
                integer,
                fraction: (scaled & 0xff) as u8,
            },
            Err(_) => Self::integer(MAX_INTEGER),
        }
    }

    /// Integer part.
    pub const fn integer_part(&self) -> u16 {
        self.integer
    }

    /// Fractional part in 1/256 steps.
    pub const fn fraction(&self) -> u8 {
        self.fraction
    }

    /// `SMx_CLKDIV` register value.
    pub const fn register_value(&self) -> u32 {
        ((self.integer as u32) << 16) | ((self.fraction as u32) << 8)
    }

    /// Average output frequency for a `sys_hz` input.
    #[allow(clippy::cast_possible_truncation)] // output never exceeds sys_hz
    pub fn output_hz(&self, sys_hz: u32) -> u32 {
        let divisor = (u64::from(self.integer) << 8) | u64::from(self.fraction);
        ((u64::from(sys_hz) << 8) / divisor) as u32
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SYS: u32 = 125_000_000;
    const VGA_HALF_PIXEL: u32 = 12_588_000;

    #[test]
    fn default_clock_divides_by_ten() {
        let divider = ClockDivider::nearest(SYS, VGA_HALF_PIXEL);
        assert_eq!(divider.integer_part(), 10);
        assert_eq!(divider.fraction(), 0);
        assert_eq!(divider.register_value(), 10 << 16);
        assert_eq!(divider.output_hz(SYS), 12_500_000);
    }

    #[test]
    fn overclocked_system_scales_divider() {
        // 252 MHz is the classic overclock for an exact 25.2 MHz multiple.
        assert_eq!(ClockDivider::nearest(252_000_000, VGA_HALF_PIXEL).integer_part(), 20);
    }

    #[test]
    fn exact_divider_keeps_fraction() {
        let divider = ClockDivider::exact(SYS, VGA_HALF_PIXEL);
        assert_eq!(divider.integer_part(), 9);
        // 125 / 12.588 = 9.930 -> 0.930 * 256 = 238
        assert_eq!(divider.fraction(), 238);
        let error = divider.output_hz(SYS).abs_diff(VGA_HALF_PIXEL);
        assert!(error < 10_000, "fractional divider within 10 kHz, got {error}");
    }

    #[test]
    fn degenerate_inputs_are_clamped() {
        assert_eq!(ClockDivider::nearest(SYS, 0).integer_part(), MAX_INTEGER);
        assert_eq!(ClockDivider::nearest(1, SYS).integer_part(), 1);
        assert_eq!(ClockDivider::integer(0).integer_part(), 1);
        assert_eq!(ClockDivider::exact(1, SYS).integer_part(), 1);
    }
}
