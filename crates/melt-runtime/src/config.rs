//! Installation configuration

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use melt_body::Viewport;
use melt_core::{MeltError, MeltResult};
use melt_session::{EvictionPolicy, SessionConfig, DEFAULT_TOUCHING_THRESHOLD_BASE};
use melt_transport::DEFAULT_TRACKING_PORT;
use serde::Deserialize;

/// Installation configuration.
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes:
///
/// ```json
/// { "live_input": false, "recordings_dir": "takes", "seed": 7 }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallationConfig {
    /// Where tracking datagrams arrive
    pub bind_addr: SocketAddr,
    /// Frame rate of the main loop
    pub fps: u32,
    /// Datagrams buffered between the receive task and the frame loop
    pub channel_capacity: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub touching_threshold_base: f32,
    pub stale_timeout_ms: u64,
    pub color_interval_secs: f64,
    pub eviction: EvictionPolicy,
    /// Listen for the sensor; when false, loop the newest recording
    pub live_input: bool,
    pub recordings_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        InstallationConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_TRACKING_PORT)),
            fps: 60,
            channel_capacity: 1024,
            viewport_width: session.viewport.width,
            viewport_height: session.viewport.height,
            touching_threshold_base: DEFAULT_TOUCHING_THRESHOLD_BASE,
            stale_timeout_ms: session.stale_timeout.as_millis() as u64,
            color_interval_secs: session.color_interval.as_secs_f64(),
            eviction: session.eviction,
            live_input: true,
            recordings_dir: PathBuf::from("recordings"),
            seed: None,
        }
    }
}

impl InstallationConfig {
    /// Replay the newest recording instead of listening
    pub fn playback() -> Self {
        InstallationConfig {
            live_input: false,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> MeltResult<Self> {
        let config: InstallationConfig =
            serde_json::from_str(text).map_err(|e| MeltError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> MeltResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| MeltError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> MeltResult<()> {
        if self.fps == 0 {
            return Err(MeltError::InvalidConfig("fps must be positive".into()));
        }
        if self.channel_capacity == 0 {
            return Err(MeltError::InvalidConfig("channel_capacity must be positive".into()));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(MeltError::InvalidConfig(format!(
                "viewport {}x{} is empty",
                self.viewport_width, self.viewport_height
            )));
        }
        if !(self.touching_threshold_base > 0.0) {
            return Err(MeltError::InvalidConfig(
                "touching_threshold_base must be positive".into(),
            ));
        }
        if !self.color_interval_secs.is_finite() || self.color_interval_secs < 0.0 {
            return Err(MeltError::InvalidConfig(
                "color_interval_secs must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            viewport: Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            },
            touching_threshold_base: self.touching_threshold_base,
            stale_timeout: Duration::from_millis(self.stale_timeout_ms),
            color_interval: Duration::from_secs_f64(self.color_interval_secs),
            eviction: self.eviction,
            seed: self.seed,
        }
    }
}
