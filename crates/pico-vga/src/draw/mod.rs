//! Compositing into the back buffer
//!
//! - [`Sprite`] / [`SpriteSheet`]: views over packed pixel tables
//! - [`BackBuffer::draw_sprite`](crate::video::BackBuffer::draw_sprite): the
//!   clipped, phase-aware blitter
//! - [`Rgb222`]: the 6-bit color for embedded-graphics drawing

pub mod blit;
pub mod sprite;
pub mod target;

pub use blit::{opaque_mask, TRANSPARENT};
pub use sprite::{Sprite, SpriteSheet};
pub use target::Rgb222;
