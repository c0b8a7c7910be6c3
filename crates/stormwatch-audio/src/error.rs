//! Error types for audio cues.

use std::path::PathBuf;

use thiserror::Error;

/// Audio errors. None of these are fatal to the dashboard.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Sound file does not exist
    #[error("Sound file not found: {path}")]
    MissingFile { path: PathBuf },

    /// Sound file could not be opened or decoded
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// No usable output device
    #[error("Audio output unavailable: {0}")]
    OutputDevice(String),

    /// Playback thread has exited
    #[error("Audio playback thread is no longer running")]
    ThreadGone,

    /// Playback thread could not be started
    #[error("Failed to start audio thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

/// Result type for audio operations.
pub type Result<T> = std::result::Result<T, AudioError>;
