//! Frame-rate and blink bookkeeping for the main loop

#![allow(clippy::arithmetic_side_effects)] // frame counts wrap long after any realistic uptime

/// Frames drawn per wall-clock second.
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    last_fps: u32,
    frames: u32,
    last_ms: u64,
}

impl FpsCounter {
    /// Counter that reports 0 until a second has passed.
    pub const fn new() -> Self {
        Self {
            last_fps: 0,
            frames: 0,
            last_ms: 0,
        }
    }

    /// Count one frame drawn at `now_ms` and return the previous second's
    /// total.
    pub fn tick(&mut self, now_ms: u64) -> u32 {
        if now_ms / 1000 != self.last_ms / 1000 {
            self.last_fps = self.frames;
            self.frames = 0;
        }
        self.frames = self.frames.wrapping_add(1);
        self.last_ms = now_ms;
        self.last_fps
    }
}

/// Toggles a status LED every 31 frames, starting lit.
#[derive(Debug, Clone)]
pub struct Blinker {
    count: u32,
    on: bool,
}

impl Blinker {
    /// Frames between toggles, minus one.
    pub const PERIOD: u32 = 30;

    /// LED on, count at zero.
    pub const fn new() -> Self {
        Self { count: 0, on: true }
    }

    /// Current LED state.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Count a frame. Returns the new LED state when it changes.
    pub fn tick(&mut self) -> Option<bool> {
        let elapsed = self.count;
        self.count += 1;
        if elapsed < Self::PERIOD {
            return None;
        }
        self.count = 0;
        self.on = !self.on;
        Some(self.on)
    }
}

impl Default for Blinker {
    fn default() -> Self {
        Self::new()
    }
}
