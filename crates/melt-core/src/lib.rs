//! MeltingMe Core - Fundamental types shared across the installation
//!
//! This crate defines:
//! - Geometry primitives (Vec2, Vec3)
//! - The fixed skeletal vocabulary (JointId, SectionId)
//! - Display colors assigned to bodies
//! - Session time (SessionTime, FrameTime)
//! - Error types for the I/O collaborators

pub mod color;
pub mod error;
pub mod geometry;
pub mod joint;
pub mod section;
pub mod time;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use joint::*;
pub use section::*;
pub use time::*;
