//! Looping playback of a recording

use melt_core::SessionTime;
use melt_wire::OscMessage;

use crate::format::Recording;

/// Replays a recording against session time.
///
/// Each call to [`Playback::due`] yields every message whose offset has
/// elapsed since the current pass started. Once the last message has been
/// dispatched the next call starts a new pass.
#[derive(Debug)]
pub struct Playback {
    recording: Recording,
    cursor: usize,
    started: Option<SessionTime>,
    loops: u64,
}

impl Playback {
    pub fn new(recording: Recording) -> Self {
        Playback {
            recording,
            cursor: 0,
            started: None,
            loops: 0,
        }
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn is_empty(&self) -> bool {
        self.recording.is_empty()
    }

    /// Completed passes
    pub fn loops(&self) -> u64 {
        self.loops
    }

    /// Messages left in the current pass
    pub fn remaining(&self) -> usize {
        self.recording.len() - self.cursor
    }

    /// Messages due at `now`, in recorded order
    pub fn due(&mut self, now: SessionTime) -> Vec<OscMessage> {
        if self.recording.is_empty() {
            return Vec::new();
        }

        if self.cursor >= self.recording.len() {
            self.cursor = 0;
            self.started = Some(now);
            self.loops += 1;
            tracing::debug!("playback looped ({} passes)", self.loops);
        }
        let started = *self.started.get_or_insert(now);
        let elapsed = (now - started).as_secs_f32();

        let mut out = Vec::new();
        while let Some(entry) = self.recording.messages.get(self.cursor) {
            if entry.time > elapsed {
                break;
            }
            out.push(entry.message.clone());
            self.cursor += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(times: &[f32]) -> Recording {
        let mut recording = Recording::new();
        for (i, t) in times.iter().enumerate() {
            recording.push(*t, melt_wire::message(format!("/m/{i}"), Vec::new()));
        }
        recording
    }

    fn addresses(messages: &[OscMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.addr.as_str()).collect()
    }

    #[test]
    fn test_dispatches_by_elapsed_time() {
        let mut playback = Playback::new(recording(&[0.0, 0.1, 0.5]));
        let t0 = SessionTime::from_secs_f64(10.0);

        assert_eq!(addresses(&playback.due(t0)), vec!["/m/0"]);
        assert!(playback.due(SessionTime::from_secs_f64(10.05)).is_empty());
        assert_eq!(addresses(&playback.due(SessionTime::from_secs_f64(10.6))), vec!["/m/1", "/m/2"]);
        assert_eq!(playback.remaining(), 0);
    }

    #[test]
    fn test_loops_when_exhausted() {
        let mut playback = Playback::new(recording(&[0.0, 0.2]));
        playback.due(SessionTime::from_secs_f64(0.0));
        playback.due(SessionTime::from_secs_f64(0.3));
        assert_eq!(playback.loops(), 0);

        // New pass starts at the next call
        let again = playback.due(SessionTime::from_secs_f64(5.0));
        assert_eq!(addresses(&again), vec!["/m/0"]);
        assert_eq!(playback.loops(), 1);
        assert!(playback.due(SessionTime::from_secs_f64(5.1)).is_empty());
        assert_eq!(addresses(&playback.due(SessionTime::from_secs_f64(5.25))), vec!["/m/1"]);
    }

    #[test]
    fn test_empty_recording_yields_nothing() {
        let mut playback = Playback::new(Recording::new());
        assert!(playback.due(SessionTime::from_secs_f64(1.0)).is_empty());
        assert_eq!(playback.loops(), 0);
    }
}
