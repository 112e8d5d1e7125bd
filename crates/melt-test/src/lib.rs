//! MeltingMe Test Harness - deterministic installation simulation
//!
//! This crate provides:
//! - Synthetic body poses in sensor space
//! - A frame-stepped simulator that feeds poses through the OSC codec
//!   into a tracking session on a simulated clock

pub mod pose;
pub mod simulator;

pub use pose::*;
pub use simulator::*;
