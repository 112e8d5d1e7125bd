//! Recording text format

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use melt_core::{MeltError, MeltResult};
use melt_wire::{message, OscMessage, OscType};

/// File extension of recordings
pub const RECORDING_EXTENSION: &str = "txt";

/// Lines with fewer fields than this are skipped
const MIN_FIELDS: usize = 5;

/// One message and when it arrived
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedMessage {
    /// Seconds since the recording started
    pub time: f32,
    pub message: OscMessage,
}

impl RecordedMessage {
    pub fn new(time: f32, message: OscMessage) -> Self {
        RecordedMessage { time, message }
    }

    /// Format as one line, without the newline
    pub fn to_line(&self) -> String {
        let mut line = format!("{}|{}", self.time, self.message.addr);
        for arg in &self.message.args {
            line.push('|');
            // Writing into a String cannot fail
            let _ = match arg {
                OscType::Float(v) => write!(line, "f{v:.6}"),
                OscType::String(s) => write!(line, "s{s}"),
                OscType::Int(v) => write!(line, "i{v}"),
                _ => write!(line, "u0"),
            };
        }
        line
    }

    /// Parse one line. `number` is only used for error reporting.
    pub fn parse_line(line: &str, number: usize) -> MeltResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < MIN_FIELDS {
            return Err(MeltError::MalformedRecording {
                line: number,
                reason: format!("expected at least {MIN_FIELDS} fields, got {}", fields.len()),
            });
        }

        let time: f32 = fields[0].trim().parse().map_err(|_| MeltError::MalformedRecording {
            line: number,
            reason: format!("bad timestamp {:?}", fields[0]),
        })?;

        let mut message = message(fields[1], Vec::new());
        for token in &fields[2..] {
            // Tag plus at least one character of value
            if token.len() <= 1 {
                continue;
            }
            let (tag, value) = token.split_at(1);
            match tag {
                "f" => message.args.push(OscType::Float(value.parse().unwrap_or(0.0))),
                "s" => message.args.push(OscType::String(value.to_string())),
                "i" => message.args.push(OscType::Int(value.parse().unwrap_or(0))),
                _ => {}
            }
        }

        Ok(RecordedMessage { time, message })
    }
}

/// A captured session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recording {
    pub messages: Vec<RecordedMessage>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f32, message: OscMessage) {
        self.messages.push(RecordedMessage::new(time, message));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Offset of the last message
    pub fn duration(&self) -> f32 {
        self.messages.last().map(|m| m.time).unwrap_or(0.0)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for message in &self.messages {
            out.push_str(&message.to_line());
            out.push('\n');
        }
        out
    }

    /// Parse a recording, skipping malformed lines
    pub fn parse(text: &str) -> Self {
        let mut recording = Recording::new();
        for (i, line) in text.lines().enumerate() {
            match RecordedMessage::parse_line(line, i + 1) {
                Ok(message) => recording.messages.push(message),
                Err(e) => tracing::debug!("skipping recording line: {}", e),
            }
        }
        recording
    }

    pub fn load(path: &Path) -> MeltResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> MeltResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_text())?;
        Ok(())
    }
}

/// Newest recording in `dir`, by file name
pub fn latest_recording(dir: &Path) -> MeltResult<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MeltError::NoRecording(dir.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut recordings = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == RECORDING_EXTENSION) {
            recordings.push(path);
        }
    }
    recordings.sort();
    recordings
        .pop()
        .ok_or_else(|| MeltError::NoRecording(dir.display().to_string()))
}
