//! MeltingMe Record - session capture and replay
//!
//! Recordings are plain text, one OSC message per line:
//!
//! ```text
//! 0.016667|/bodies/1/joints/HandLeft|f0.251000|f-0.112000|f1.873000|sTracked
//! ```
//!
//! The first field is seconds since the recording started, the second the
//! OSC address, the rest type-tagged arguments (`f` float, `s` string,
//! `i` integer, `u0` for anything else).
//!
//! Playback feeds the same messages back at their recorded offsets and
//! loops when it runs out, so the melt model cannot tell it from a live feed.

pub mod format;
pub mod playback;
pub mod recorder;

pub use format::*;
pub use playback::*;
pub use recorder::*;
