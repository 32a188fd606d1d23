//! The demo application logic
//!
//! Everything the firmware's main loop does per frame, kept free of
//! hardware so it runs in host tests: scene animation, frame-rate
//! accounting and the status LED cadence. Randomness is injected through
//! [`Random`]; the firmware reads the ring oscillator, tests use
//! [`XorShift32`].

pub mod assets;
pub mod fps;
pub mod random;
pub mod scene;

pub use fps::{Blinker, FpsCounter};
pub use random::{Random, XorShift32};
pub use scene::{Character, Scene, CHARACTER_COUNT, MESSAGES, WALK_CYCLE};
