//! Installation - the runtime entity driving one tracking session

use std::path::PathBuf;
use std::time::{Duration, Instant};

use melt_core::{FrameTime, MeltResult};
use melt_record::{latest_recording, Playback, Recorder, Recording};
use melt_session::{SessionSnapshot, TickReport, TrackingSession};
use melt_wire::OscMessage;
use tracing::{info, warn};

use crate::config::InstallationConfig;
use crate::control::Control;

/// Whether the main loop keeps going after a control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub frames: u64,
    pub live_messages: u64,
    pub playback_messages: u64,
    pub recordings_saved: u64,
    pub last_frame_duration: Duration,
}

/// One tracking session plus its capture and replay machinery
pub struct Installation {
    config: InstallationConfig,
    session: TrackingSession,
    recorder: Recorder,
    playback: Option<Playback>,
    stats: RuntimeStats,
}

impl Installation {
    /// Installation fed only by live input
    pub fn new(config: InstallationConfig) -> Self {
        Installation {
            session: TrackingSession::with_config(config.session_config()),
            recorder: Recorder::new(config.recordings_dir.clone()),
            playback: None,
            stats: RuntimeStats::default(),
            config,
        }
    }

    /// Build from configuration. Without live input the newest recording
    /// is loaded for playback and its absence is an error.
    pub fn from_config(config: InstallationConfig) -> MeltResult<Self> {
        config.validate()?;
        let playback = if config.live_input {
            None
        } else {
            let path = latest_recording(&config.recordings_dir)?;
            let recording = Recording::load(&path)?;
            info!(
                "playing back {} ({} messages, {:.1}s)",
                path.display(),
                recording.len(),
                recording.duration()
            );
            Some(recording)
        };

        let installation = Self::new(config);
        Ok(match playback {
            Some(recording) => installation.with_playback(recording),
            None => installation,
        })
    }

    pub fn with_playback(mut self, recording: Recording) -> Self {
        self.playback = Some(Playback::new(recording));
        self
    }

    pub fn config(&self) -> &InstallationConfig {
        &self.config
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TrackingSession {
        &mut self.session
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    /// Run one frame over the messages that arrived since the last one
    pub fn frame(&mut self, frame: FrameTime, live: Vec<OscMessage>) -> TickReport {
        let start = Instant::now();
        self.stats.frames += 1;

        self.session.begin_frame();

        self.stats.live_messages += live.len() as u64;
        for message in &live {
            self.recorder.record(message, frame.now);
            self.session.ingest(message, frame.now);
        }

        if let Some(playback) = self.playback.as_mut() {
            let due = playback.due(frame.now);
            self.stats.playback_messages += due.len() as u64;
            for message in &due {
                self.session.ingest(message, frame.now);
            }
        }

        let report = self.session.tick(frame);
        self.stats.last_frame_duration = start.elapsed();
        report
    }

    /// Apply an operator control
    pub fn control(&mut self, control: Control) -> MeltResult<Flow> {
        match control {
            Control::ToggleRecording => {
                if let Some(path) = self.recorder.toggle()? {
                    self.stats.recordings_saved += 1;
                    info!("recording written to {}", path.display());
                }
            }
            Control::RestoreAll => {
                self.session.restore_all();
                info!("restoring {} bodies", self.session.len());
            }
            Control::ReleaseRestore => self.session.release_restore(),
            Control::RandomizeColors => self.session.randomize_colors(),
            Control::Status => self.log_status(),
            Control::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    fn log_status(&self) {
        let session = self.session.stats();
        info!(
            bodies = self.session.len(),
            frames = self.stats.frames,
            updates = session.updates_applied,
            ignored = session.messages_ignored,
            recording = self.recorder.is_armed(),
            playback = self.playback.is_some(),
            "status"
        );
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => info!("{}", json),
            Err(e) => warn!("failed to serialize snapshot: {}", e),
        }
    }

    /// Save any take still in progress
    pub fn shutdown(&mut self) -> MeltResult<Option<PathBuf>> {
        let saved = self.recorder.stop()?;
        if saved.is_some() {
            self.stats.recordings_saved += 1;
        }
        Ok(saved)
    }
}
