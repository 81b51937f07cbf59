//! Frame clock driving the simulation.
//!
//! [`FrameClock`] turns wall-clock frames into the `delta_time` passed to
//! [`ParticleSimulation::update`](crate::ParticleSimulation::update). It
//! tracks simulated time (the sum of deltas handed out), not wall time, so
//! pausing and scaling affect it directly.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new().with_fixed_delta(1.0 / 60.0);
//!
//! loop {
//!     let dt = clock.tick();
//!     sim.update(dt, &mut wells);
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest delta handed out by default. Keeps a debugger stall or a
/// minimized window from launching every particle out of its orbit.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Per-frame delta source with pause, time scale, fixed step and clamp.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    delta: f32,
    simulated: f64,
    frame_count: u64,
    fps: f32,
    fps_frames: u64,
    fps_window_start: Instant,
    fps_interval: Duration,
    paused: bool,
    fixed_delta: Option<f32>,
    max_delta: f32,
    time_scale: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            delta: 0.0,
            simulated: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_window_start: now,
            fps_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            max_delta: DEFAULT_MAX_DELTA,
            time_scale: 1.0,
        }
    }

    /// Use a constant step instead of measured frame time.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.set_fixed_delta(Some(delta));
        self
    }

    /// Advance one frame and return the delta to simulate.
    ///
    /// Returns 0 while paused. Otherwise the raw (or fixed) delta is
    /// clamped to `max_delta`, then multiplied by the time scale.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        if self.paused {
            self.delta = 0.0;
            return 0.0;
        }

        let step = self.fixed_delta.unwrap_or(raw).min(self.max_delta);
        self.delta = step * self.time_scale;
        self.simulated += self.delta as f64;
        self.frame_count += 1;

        let window = now.duration_since(self.fps_window_start);
        if window >= self.fps_interval {
            self.fps = (self.frame_count - self.fps_frames) as f32 / window.as_secs_f32();
            self.fps_frames = self.frame_count;
            self.fps_window_start = now;
        }

        self.delta
    }

    /// Delta returned by the last [`tick`](Self::tick).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Sum of all deltas handed out.
    #[inline]
    pub fn simulated(&self) -> f64 {
        self.simulated
    }

    /// Frames advanced while not paused.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock frame rate, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.last_tick = Instant::now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// `None` returns to measured frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.filter(|d| *d > 0.0);
    }

    /// Negative scales clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Largest step handed out before scaling. Non-positive values are ignored.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        if max_delta > 0.0 {
            self.max_delta = max_delta;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
