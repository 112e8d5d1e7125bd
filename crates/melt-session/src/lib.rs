//! MeltingMe Session - the set of tracked bodies and how they interact
//!
//! Per frame, in order:
//! 1. `begin_frame` - joints remember their previous positions
//! 2. `ingest` / `apply` - tracking updates create and move bodies
//! 3. `tick` - color rotation, stale body eviction, section update,
//!    touch detection
//! 4. `snapshot` - geometry and flags for the renderer
//!
//! Touch rules: hands of two bodies sharing a color heal both of them;
//! hands of two differently colored bodies melt both faster. Touching your
//! own hands heals you, unless someone else shares your color.

pub mod config;
pub mod session;
pub mod snapshot;
pub mod touch;

pub use config::*;
pub use session::*;
pub use snapshot::*;
pub use touch::*;
