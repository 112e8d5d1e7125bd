//! MeltingMe Runtime - installation orchestration and main loop
//!
//! Each frame runs, in order:
//! 1. Clear per-frame joint flags
//! 2. Drain the tracking feed
//! 3. Capture and ingest live messages
//! 4. Dispatch due playback messages
//! 5. Tick the session (colors, eviction, melt update, touch detection)
//!
//! Operator controls are applied between frames.

pub mod config;
pub mod control;
pub mod installation;

pub use config::*;
pub use control::*;
pub use installation::*;
