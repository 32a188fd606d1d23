//! Pico VGA
//!
//! 320x240 VGA output for the RP2040, generated by one PIO state machine fed
//! by two chained DMA channels, plus a packed-pixel sprite compositor and a
//! bitmap text renderer for drawing into the back buffer.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs, demo)
//!         ↓
//! Compositor + text (draw, text)
//!         ↓
//! Video engine (video: geometry, templates, descriptor chain, swap)
//!         ↓
//! RP2040 binding (hal) over platform register math
//! ```
//!
//! Once started, the descriptor chain produces every scanline without CPU
//! involvement. The CPU only repoints the active-line descriptors at the
//! freshly drawn buffer once per frame ([`video::Vga::swap`]) and the
//! end-of-frame interrupt re-arms the chain and bumps a frame counter.
//!
//! # Features
//!
//! - `hardware` - Build for the RP2040 (embassy-rp, cortex-m, defmt)
//! - `multicore` - Service the end-of-frame interrupt on core 1
//! - `defmt` - `defmt::Format` derives and log lines
//! - `std` - Enable standard library (mocks for downstream tests)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo run --release -p pico-vga --target thumbv6m-none-eabi --features multicore
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for pixel math:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod demo;
pub mod draw;
pub mod error;
pub mod hal;
pub mod text;
pub mod video;

// Re-export key types
pub use draw::{Rgb222, Sprite, SpriteSheet};
pub use error::VgaError;
pub use text::{Alignment, Font, TextRenderer, FONT_6X8};
pub use video::{BackBuffer, FrameCounter, Screen, SignalGeometry, Vga, VideoMemory};
