//! Board configuration and constants
//!
//! Central place for pin assignments, clock assumptions and the fixed
//! peripheral resources the scanout claims. Everything that names a GPIO or
//! a channel number should reference these constants rather than hardcode
//! values.

/// The application name
pub const APP_NAME: &str = "Pico VGA";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// First of the eight consecutive VGA output pins.
///
/// | Pin offset | Signal     |
/// |------------|------------|
/// | +0, +1     | Blue 0-1   |
/// | +2, +3     | Green 0-1  |
/// | +4, +5     | Red 0-1    |
/// | +6         | H-Sync     |
/// | +7         | V-Sync     |
pub const VGA_PIN_BASE: u8 = 2;

/// Number of consecutive pins driven by the pixel state machine.
pub const VGA_PIN_COUNT: u8 = 8;

/// On-board LED of the Raspberry Pi Pico.
pub const LED_PIN: u8 = 25;

/// System clock after `embassy_rp::init` with the default configuration.
pub const SYS_CLOCK_HZ: u32 = 125_000_000;

/// PIO0 state machine that shifts pixels out.
pub const PIXEL_STATE_MACHINE: u8 = 0;

/// DMA channel that copies descriptors into the data channel.
pub const DMA_CONTROL_CHANNEL: u8 = 0;

/// DMA channel that streams scanline segments into the PIO TX FIFO.
pub const DMA_DATA_CHANNEL: u8 = 1;

/// Development mode banner
pub const fn dev_banner() -> &'static str {
    "Pico VGA - Development Mode"
}
