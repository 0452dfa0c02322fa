//! Time management utilities
//!
//! [`Time`] is the simulation clock queried by the scheduler and the
//! integrator. [`Timer`] measures wall-clock frame deltas for callers that
//! want the engine to drive itself from real time.

use std::time::Instant;

/// Default fixed step: 60 simulation steps per second, in milliseconds
pub const DEFAULT_FIXED_DELTA_TIME_MS: f32 = 1000.0 / 60.0;

/// Simulation clock
///
/// Holds the constant fixed step and the bookkeeping of the last frame and
/// fixed step. Only the engine advances it.
#[derive(Debug, Clone)]
pub struct Time {
    fixed_delta_time: f32,
    delta_time: f32,
    alpha: f32,
    fixed_step_count: u64,
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DELTA_TIME_MS)
    }
}

impl Time {
    /// Create a clock with the given fixed step in milliseconds
    pub fn new(fixed_delta_time_ms: f32) -> Self {
        Self {
            fixed_delta_time: fixed_delta_time_ms,
            delta_time: 0.0,
            alpha: 1.0,
            fixed_step_count: 0,
            frame_count: 0,
        }
    }

    /// Fixed step in milliseconds
    pub fn fixed_delta_time(&self) -> f32 {
        self.fixed_delta_time
    }

    /// Fixed step in seconds
    pub fn fixed_delta_time_in_second(&self) -> f32 {
        self.fixed_delta_time / 1000.0
    }

    /// Last external frame delta in milliseconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Fraction of a fixed step used by the most recent step (1 for full steps)
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of fixed steps run so far, partial steps included
    pub fn fixed_step_count(&self) -> u64 {
        self.fixed_step_count
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Record one fixed step
    pub(crate) fn fixed_update(&mut self, frame_delta_ms: f32, alpha: f32) {
        self.delta_time = frame_delta_ms;
        self.alpha = alpha;
        self.fixed_step_count += 1;
    }

    /// Record one frame
    pub(crate) fn update(&mut self, frame_delta_ms: f32) {
        self.delta_time = frame_delta_ms;
        self.frame_count += 1;
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Restart frame measurement from now without counting the gap
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the time since the last frame in milliseconds
    pub fn delta_time_ms(&self) -> f32 {
        self.delta_time * 1000.0
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_delta_in_seconds() {
        let time = Time::new(20.0);
        assert_relative_eq!(time.fixed_delta_time_in_second(), 0.02);
    }

    #[test]
    fn test_step_and_frame_counters() {
        let mut time = Time::default();
        time.fixed_update(33.0, 1.0);
        time.fixed_update(33.0, 0.5);
        time.update(33.0);

        assert_eq!(time.fixed_step_count(), 2);
        assert_eq!(time.frame_count(), 1);
        assert_eq!(time.alpha(), 0.5);
        assert_eq!(time.delta_time(), 33.0);
    }

    #[test]
    fn test_timer_accumulates() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.delta_time() >= 0.0);
        assert_eq!(timer.delta_time_ms(), timer.delta_time() * 1000.0);

        timer.reset();
        assert_eq!(timer.delta_time(), 0.0);
        assert_eq!(timer.frame_count(), 2);
    }
}
