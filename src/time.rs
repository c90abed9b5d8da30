//! Frame timing for the simulation tick.
//!
//! The clock advances in fixed steps of `1 / target_fps` seconds so that a
//! run is reproducible regardless of how fast frames are actually presented.
//! Wall-clock time is only used to measure FPS.
//!
//! # Example
//!
//! ```ignore
//! use hairsim::time::FrameClock;
//!
//! let mut clock = FrameClock::new(60.0);
//!
//! // In your frame loop:
//! let time = clock.tick();
//! hair.update(time);
//!
//! println!("Elapsed: {:.2}s", time.elapsed);
//! println!("Delta: {:.4}s", time.delta);
//! println!("FPS: {:.1}", clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Timing values for one frame.
///
/// `delta` drives integration; `elapsed` is only a phase for render-time
/// noise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Simulated seconds since the clock started.
    pub elapsed: f32,
    /// Simulated seconds covered by this frame.
    pub delta: f32,
    /// Frames ticked since the clock started.
    pub frame: u64,
}

impl FrameTime {
    pub fn new(elapsed: f32, delta: f32, frame: u64) -> Self {
        Self {
            elapsed,
            delta,
            frame,
        }
    }
}

/// Fixed-rate frame clock.
#[derive(Debug)]
pub struct FrameClock {
    /// Unscaled seconds per frame.
    step: f32,
    elapsed: f32,
    delta: f32,
    frame: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl FrameClock {
    /// A clock ticking at `target_fps`; non-positive rates fall back to 60.
    pub fn new(target_fps: f32) -> Self {
        let fps = if target_fps > 0.0 && target_fps.is_finite() {
            target_fps
        } else {
            60.0
        };
        Self {
            step: 1.0 / fps,
            elapsed: 0.0,
            delta: 0.0,
            frame: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Advance one frame. Call once per redraw.
    pub fn tick(&mut self) -> FrameTime {
        self.frame += 1;

        self.delta = if self.paused { 0.0 } else { self.step * self.time_scale };
        self.elapsed += self.delta;

        let now = Instant::now();
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame;
            self.fps_update_time = now;
        }

        self.current()
    }

    /// Timing of the most recent tick.
    pub fn current(&self) -> FrameTime {
        FrameTime::new(self.elapsed, self.delta, self.frame)
    }

    /// Wall-clock time between frames at the target rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f32(self.step)
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// While paused, ticks report a zero delta and `elapsed` stops.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Back to frame zero, keeping rate, scale and pause state.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.delta = 0.0;
        self.frame = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::default();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
        assert_eq!(clock.current(), FrameTime::default());
    }

    #[test]
    fn test_fixed_steps() {
        let mut clock = FrameClock::new(60.0);
        let first = clock.tick();
        let second = clock.tick();
        assert!((first.delta - 1.0 / 60.0).abs() < 1e-7);
        assert!((second.elapsed - 2.0 / 60.0).abs() < 1e-6);
        assert_eq!(second.frame, 2);
    }

    #[test]
    fn test_pause_gives_zero_delta() {
        let mut clock = FrameClock::new(30.0);
        clock.tick();
        clock.pause();
        let before = clock.current().elapsed;
        let t = clock.tick();
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.elapsed, before);
        assert_eq!(t.frame, 2);

        clock.toggle_pause();
        assert!(clock.tick().delta > 0.0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FrameClock::new(10.0);
        clock.set_time_scale(0.5);
        assert!((clock.tick().delta - 0.05).abs() < 1e-7);

        // Negative scale should clamp to 0
        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.tick().delta, 0.0);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let clock = FrameClock::new(0.0);
        assert_eq!(clock.frame_interval(), Duration::from_secs_f32(1.0 / 60.0));
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::default();
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.current().elapsed, 0.0);
    }
}
