//! Session configuration

use std::time::Duration;

use melt_body::Viewport;
use serde::Deserialize;

/// Default divisor turning a body's scale into its touching distance
pub const DEFAULT_TOUCHING_THRESHOLD_BASE: f32 = 10.0;

/// Which stale bodies a tick removes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Every body past the timeout
    #[default]
    All,
    /// At most one body per tick
    OnePerFrame,
}

/// Tracking session configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Display surface bodies are placed on
    pub viewport: Viewport,
    /// Touching distance is `scale / touching_threshold_base`
    pub touching_threshold_base: f32,
    /// A body with no update for longer than this is gone
    pub stale_timeout: Duration,
    /// Colors are reshuffled this often
    pub color_interval: Duration,
    pub eviction: EvictionPolicy,
    /// Seed for color assignment; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            viewport: Viewport::default(),
            touching_threshold_base: DEFAULT_TOUCHING_THRESHOLD_BASE,
            stale_timeout: Duration::from_secs(2),
            color_interval: Duration::from_secs(10),
            eviction: EvictionPolicy::All,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Deterministic configuration for simulations and tests
    pub fn seeded(seed: u64) -> Self {
        SessionConfig {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
