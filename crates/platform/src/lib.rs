//! RP2040 platform layer for the Pico VGA engine
//!
//! This crate holds everything about the RP2040 that can be computed without
//! touching the chip: register addresses, DMA control words, PIO instruction
//! encodings, state machine configuration words, clock dividers and SRAM
//! placement rules. Register programming is expressed as ordered batches of
//! [`RegisterWrite`]s that the firmware applies through a [`RegisterBus`]; on
//! the host the same batches are applied to [`mocks::MockRegisters`] and
//! inspected by tests.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (pico-vga demo binary)
//!         ↓
//! Video engine + compositor (pico-vga crate)
//!         ↓
//! Platform layer (this crate - register math and scanout traits)
//!         ↓
//! Hardware Layer (embassy-rp + volatile MMIO)
//! ```
//!
//! # Features
//!
//! - `std`: expose [`mocks`] to other crates' tests
//! - `defmt`: derive `defmt::Format` on public types

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this register-math crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // register accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clock_config;
pub mod config;
pub mod dma;
pub mod dma_safety;
pub mod mocks;
pub mod pio;
pub mod registers;
pub mod scanout;

pub use clock_config::ClockDivider;
pub use dma::{ChannelControl, Descriptor, ScanoutChannels};
pub use pio::PixelProgram;
pub use registers::{RegisterBus, RegisterWrite};
pub use scanout::{HandshakeError, IrqContext, ScanoutHardware};
