//! End-of-frame counter
//!
//! The only state shared with the interrupt. Written by the end-of-frame
//! handler alone and read by the drawing loop.

use core::sync::atomic::{AtomicU32, Ordering};

/// Frames completed since the scanout started.
pub struct FrameCounter(AtomicU32);

impl FrameCounter {
    /// Counter at zero.
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Current count.
    pub fn now(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Count one completed frame.
    ///
    /// Single writer only: Cortex-M0+ has no atomic read-modify-write, so
    /// this is a load followed by a store.
    pub fn increment(&self) {
        let next = self.0.load(Ordering::Relaxed).wrapping_add(1);
        self.0.store(next, Ordering::Release);
    }

    /// Spin until the count differs from `since`, returning the new count.
    ///
    /// Blocks forever if the interrupt never fires.
    pub fn wait_for_next(&self, since: u32) -> u32 {
        loop {
            let now = self.now();
            if now != since {
                return now;
            }
            core::hint::spin_loop();
        }
    }

    /// Yield to the executor until the count differs from `since`.
    pub async fn next(&self, since: u32) -> u32 {
        loop {
            let now = self.now();
            if now != since {
                return now;
            }
            embassy_futures::yield_now().await;
        }
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
