//! MeltingMe Wire - OSC codec for the skeletal tracking feed
//!
//! The tracking bridge publishes one OSC message per joint per frame:
//!
//! ```text
//! /bodies/{bodyId}/joints/{jointName}  ,fffs  x y z trackingState
//! /bodies/{bodyId}/hands/{handId}      ,ss    handState confidence
//! ```
//!
//! Packets are decoded with `rosc`; this crate turns joint messages into
//! `TrackingUpdate`s and ignores everything else.

pub mod osc;
pub mod tracking;

pub use osc::*;
pub use tracking::*;
