//! MeltingMe Body - a tracked figure that melts and reforms
//!
//! A `Skeleton` owns 25 joints and 5 body sections. Each frame the sections
//! are rebuilt as polylines through their joints, then advanced by the melt
//! or restore rules:
//!
//! - Melting runs top-down: spine, then arms, then legs.
//! - Restoring runs bottom-up: legs, then spine, then arms.
//!
//! Each section keeps `percent_left`, the intact share of its chain. The
//! dissolved remainder of the chain collapses onto the melt boundary so a
//! renderer can keep drawing a (shrinking) line.

pub mod joint;
pub mod polyline;
pub mod section;
pub mod skeleton;

pub use joint::*;
pub use polyline::*;
pub use section::*;
pub use skeleton::*;
