//! Error types for MeltingMe
//!
//! The melt model itself never fails. These errors belong to the
//! collaborators around it: wire decoding, recordings and transport.

use thiserror::Error;

/// MeltingMe errors
#[derive(Error, Debug)]
pub enum MeltError {
    // Wire errors
    #[error("Invalid OSC packet: {0}")]
    InvalidPacket(String),

    // Recording errors
    #[error("Malformed recording line {line}: {reason}")]
    MalformedRecording { line: usize, reason: String },

    #[error("No recording found in {0}")]
    NoRecording(String),

    #[error("Recording I/O error: {0}")]
    RecordingIo(#[from] std::io::Error),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Result type for MeltingMe operations
pub type MeltResult<T> = Result<T, MeltError>;
