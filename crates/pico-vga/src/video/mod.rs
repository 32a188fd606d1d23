//! VGA signal generation and frame presentation

pub mod chain;
pub mod engine;
pub mod frame;
pub mod framebuffer;
pub mod handshake;
pub mod templates;
pub mod timing;

pub use chain::DescriptorChain;
pub use engine::{Vga, VideoMemory};
pub use frame::FrameCounter;
pub use framebuffer::{BackBuffer, FramebufferStore, Screen, SlotStore};
pub use handshake::Rendezvous;
pub use templates::LineTemplates;
pub use timing::{GeometryError, SignalGeometry, SyncPolarity, Timing};
