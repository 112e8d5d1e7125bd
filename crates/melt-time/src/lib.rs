//! MeltingMe Time - frame clocks
//!
//! The melt model is driven by two numbers per frame: the session time (for
//! staleness and color rotation) and the previous frame's duration (for melt
//! and restore rates). `WallClock` derives both from the OS monotonic clock;
//! `SimulatedClock` advances by fixed steps for tests and replays.

pub mod clock;

pub use clock::*;
