//! MeltingMe installation binary
//!
//! Usage: `meltingme [config.json]`. Operator controls are read from stdin.

use std::path::Path;

use melt_runtime::{spawn_control_reader, Flow, Installation, InstallationConfig};
use melt_time::{Clock, WallClock};
use melt_transport::TrackingReceiver;
use tokio::io::BufReader;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => InstallationConfig::load(Path::new(&path))?,
        None => InstallationConfig::default(),
    };

    let mut installation = Installation::from_config(config.clone())?;

    let mut receiver = if config.live_input {
        let (receiver, addr) =
            TrackingReceiver::listen(config.bind_addr, config.channel_capacity).await?;
        info!("listening for tracking data on {}", addr);
        Some(receiver)
    } else {
        None
    };

    let mut controls = spawn_control_reader(BufReader::new(tokio::io::stdin()), 16);
    let mut clock = WallClock::new();
    let mut interval = tokio::time::interval(config.frame_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(fps = config.fps, "installation running");
    'frames: loop {
        interval.tick().await;

        while let Ok(control) = controls.try_recv() {
            match installation.control(control) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break 'frames,
                Err(e) => warn!("{} failed: {}", control, e),
            }
        }

        let live = receiver.as_mut().map(|r| r.drain()).unwrap_or_default();
        installation.frame(clock.tick(), live);
    }

    if let Some(path) = installation.shutdown()? {
        info!("recording written to {}", path.display());
    }
    info!(frames = installation.stats().frames, "installation stopped");
    Ok(())
}
