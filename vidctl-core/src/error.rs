//! Error types for the player controller

use thiserror::Error;

/// Failures reported by the playback process adapter and the stream inspector
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send {signal} to process {pid}: {reason}")]
    Signal {
        signal: &'static str,
        pid: u32,
        reason: String,
    },

    #[error("stream probe failed: {0}")]
    Probe(String),

    #[error("no playback process is running")]
    NotRunning,

    #[error("a playback process is already running (pid {0})")]
    AlreadyRunning(u32),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the player controller
pub type Result<T> = std::result::Result<T, PlayerError>;
