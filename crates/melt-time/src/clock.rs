//! Clock implementations

use std::time::{Duration, Instant};

use melt_core::{FrameTime, SessionTime};

/// Longest frame the clock will report. Longer gaps (window drags, system
/// sleep) are clamped so a single frame cannot melt a whole body.
pub const MAX_FRAME_DURATION: Duration = Duration::from_millis(100);

/// Source of frame timing
pub trait Clock {
    /// Advance to the next frame
    fn tick(&mut self) -> FrameTime;

    /// Current session time without advancing
    fn now(&self) -> SessionTime;
}

/// Wall clock - monotonic, driven by `Instant`
/// INVARIANT: session time never decreases
pub struct WallClock {
    /// Current session time
    value: SessionTime,
    /// Last tick instant
    last_update: Instant,
}

impl WallClock {
    /// Create a clock starting at zero
    pub fn new() -> Self {
        WallClock {
            value: SessionTime::ZERO,
            last_update: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .duration_since(self.last_update)
            .min(MAX_FRAME_DURATION);

        self.value = self.value.saturating_add(dt);
        self.last_update = now;
        FrameTime::new(self.value, dt)
    }

    fn now(&self) -> SessionTime {
        self.value
    }
}

/// Simulated clock - advances by a fixed step per tick
pub struct SimulatedClock {
    value: SessionTime,
    step: Duration,
}

impl SimulatedClock {
    pub fn new(step: Duration) -> Self {
        SimulatedClock {
            value: SessionTime::ZERO,
            step,
        }
    }

    /// Clock ticking at `fps` frames per second
    pub fn at_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Jump forward without producing a frame
    pub fn skip(&mut self, duration: Duration) {
        self.value = self.value.saturating_add(duration);
    }
}

impl Clock for SimulatedClock {
    fn tick(&mut self) -> FrameTime {
        self.value = self.value.saturating_add(self.step);
        FrameTime::new(self.value, self.step)
    }

    fn now(&self) -> SessionTime {
        self.value
    }
}
