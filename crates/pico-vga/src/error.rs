//! Initialization errors
//!
//! Both kinds are fatal: video output is the whole point of the firmware, so
//! there is no degraded mode to fall back to. Once [`crate::Vga::initialize`]
//! succeeds nothing in the engine can fail.

use platform::HandshakeError;

/// Why the video engine could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VgaError {
    /// A framebuffer, the line templates or the descriptor chain did not
    /// fit the memory provided.
    Allocation,
    /// The interrupt core did not confirm it was ready.
    Coordination(HandshakeError),
}

impl From<HandshakeError> for VgaError {
    fn from(err: HandshakeError) -> Self {
        Self::Coordination(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VgaError {}

impl core::fmt::Display for VgaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allocation => write!(f, "video memory unavailable"),
            Self::Coordination(err) => write!(f, "interrupt core handshake failed: {err}"),
        }
    }
}
