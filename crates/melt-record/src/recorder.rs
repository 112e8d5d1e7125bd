//! Session capture

use std::path::{Path, PathBuf};

use chrono::Local;
use melt_core::{MeltResult, SessionTime};
use melt_wire::OscMessage;

use crate::format::{Recording, RECORDING_EXTENSION};

/// File name format for new recordings; sorts chronologically
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";

/// A capture in progress
#[derive(Debug)]
struct Take {
    name: String,
    start: SessionTime,
    recording: Recording,
}

/// Captures inbound messages while recording is armed.
///
/// Arming does not start a take by itself; the take starts with the first
/// message that arrives afterwards, so recordings never open with silence.
#[derive(Debug)]
pub struct Recorder {
    dir: PathBuf,
    armed: bool,
    take: Option<Take>,
}

impl Recorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Recorder {
            dir: dir.into(),
            armed: false,
            take: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether a take has started
    pub fn is_capturing(&self) -> bool {
        self.take.is_some()
    }

    /// Messages captured so far in the current take
    pub fn captured(&self) -> usize {
        self.take.as_ref().map(|t| t.recording.len()).unwrap_or(0)
    }

    /// Flip recording on or off. Turning it off saves the current take, if
    /// any, and returns where it was written.
    pub fn toggle(&mut self) -> MeltResult<Option<PathBuf>> {
        if self.armed {
            self.stop()
        } else {
            self.armed = true;
            tracing::info!("recording armed");
            Ok(None)
        }
    }

    /// Disarm and save the current take
    pub fn stop(&mut self) -> MeltResult<Option<PathBuf>> {
        self.armed = false;
        let Some(take) = self.take.take() else {
            return Ok(None);
        };

        let path = self.dir.join(format!("{}.{}", take.name, RECORDING_EXTENSION));
        take.recording.save(&path)?;
        tracing::info!(
            "saved recording {} ({} messages, {:.1}s)",
            path.display(),
            take.recording.len(),
            take.recording.duration()
        );
        Ok(Some(path))
    }

    /// Capture one inbound message
    pub fn record(&mut self, message: &OscMessage, now: SessionTime) {
        if !self.armed {
            return;
        }
        let take = self.take.get_or_insert_with(|| {
            let name = Local::now().format(TIMESTAMP_FORMAT).to_string();
            tracing::info!("recording started: {}", name);
            Take {
                name,
                start: now,
                recording: Recording::new(),
            }
        });
        let offset = (now - take.start).as_secs_f32();
        take.recording.push(offset, message.clone());
    }
}
