//! Session time primitives
//!
//! All timestamps are measured from session start. The melt model only ever
//! compares them (staleness, color rotation) and reads the last frame's
//! duration (melt and restore rates).

use std::ops::{Add, Sub};
use std::time::Duration;

/// Session time - monotonic, microseconds since session start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionTime(pub u64);

impl SessionTime {
    pub const ZERO: SessionTime = SessionTime(0);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        SessionTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        SessionTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SessionTime((secs.max(0.0) * 1_000_000.0) as u64)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        SessionTime(self.0.saturating_add(duration.as_micros() as u64))
    }
}

impl Add<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        SessionTime(self.0 + rhs.as_micros() as u64)
    }
}

impl Sub<SessionTime> for SessionTime {
    type Output = Duration;

    /// Saturates at zero when `rhs` is later
    #[inline]
    fn sub(self, rhs: SessionTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for SessionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}s)", self.as_secs_f64())
    }
}

/// Timing of the frame being processed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Session time at the start of this frame
    pub now: SessionTime,
    /// Duration of the previous frame
    pub dt: Duration,
}

impl FrameTime {
    pub fn new(now: SessionTime, dt: Duration) -> Self {
        Self { now, dt }
    }

    /// Previous frame duration in seconds
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}
