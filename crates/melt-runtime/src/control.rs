//! Operator controls

use std::fmt;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// A command typed by the operator, one per line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Start or stop capturing the live feed
    ToggleRecording,
    /// Regrow every body and hold it whole
    RestoreAll,
    /// Let held bodies melt again
    ReleaseRestore,
    RandomizeColors,
    /// Log the session summary
    Status,
    Quit,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "record" | "rec" => Some(Control::ToggleRecording),
            "restore" | "r" => Some(Control::RestoreAll),
            "release" => Some(Control::ReleaseRestore),
            "colors" | "c" => Some(Control::RandomizeColors),
            "status" | "s" => Some(Control::Status),
            "quit" | "q" | "exit" => Some(Control::Quit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Control::ToggleRecording => "record",
            Control::RestoreAll => "restore",
            Control::ReleaseRestore => "release",
            Control::RandomizeColors => "colors",
            Control::Status => "status",
            Control::Quit => "quit",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read controls line by line from `reader` on a background task.
///
/// The channel closes when the reader hits end of input.
pub fn spawn_control_reader<R>(reader: R, capacity: usize) -> mpsc::Receiver<Control>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);

    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match Control::parse(&line) {
                    Some(control) => {
                        if tx.send(control).await.is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => tracing::warn!("unknown control {:?}", line.trim()),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("control input error: {}", e);
                    break;
                }
            }
        }
    });

    rx
}
