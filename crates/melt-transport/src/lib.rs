//! MeltingMe Transport - OSC over UDP
//!
//! A background task receives datagrams and hands them to the frame loop
//! over a bounded channel. The frame loop drains the channel without
//! blocking; when nothing arrived, the frame runs on stale data.

pub mod udp;

pub use udp::*;
