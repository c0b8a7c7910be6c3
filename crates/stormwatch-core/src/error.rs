//! Error types for STORMWATCH operations.
//!
//! This module defines [`StormError`], the error enum shared by the
//! configuration loader, the logging setup and the terminal dashboard.
//! Feed and audio failures have their own error types in their crates;
//! they are logged and swallowed by the polling loop rather than surfaced here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`StormError`].
pub type Result<T> = std::result::Result<T, StormError>;

/// Error type for STORMWATCH setup and runtime operations.
#[derive(Debug, Error)]
pub enum StormError {
    /// `--config` pointed at a file that is not there
    #[error("No config file at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Config file is not valid YAML for the expected schema
    #[error("Could not parse {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Config parsed but holds unusable values
    #[error("Invalid setting: {message}")]
    ConfigValidation { message: String },

    /// File access failed
    #[error("{operation} failed for {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log or data directory could not be created
    #[error("Cannot create {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw mode or the alternate screen is unavailable
    #[error("Cannot start the dashboard: {message}")]
    TerminalInit { message: String },

    #[error("Terminal left in a bad state: {message}")]
    TerminalRestore { message: String },

    #[error("Bug: {message}")]
    Internal { message: String },
}

impl StormError {
    /// Missing config file.
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Missing config file, keeping the underlying I/O error.
    pub fn config_not_found_with_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: Some(source),
        }
    }

    /// Create a ConfigValidation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a terminal initialization error
    pub fn terminal_init(message: impl Into<String>) -> Self {
        Self::TerminalInit {
            message: message.into(),
        }
    }

    /// Create a terminal restore error
    pub fn terminal_restore(message: impl Into<String>) -> Self {
        Self::TerminalRestore {
            message: message.into(),
        }
    }

    /// Invariant violated somewhere in STORMWATCH.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The process cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TerminalInit { .. } | Self::Internal { .. })
    }

    /// Any of the config variants.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// One-line hint printed under the error on stderr.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Create ~/.stormwatch/config.yaml or pass --config with an existing file")
            }
            Self::ConfigInvalid { .. } => {
                Some("Check YAML syntax in ~/.stormwatch/config.yaml")
            }
            Self::ConfigValidation { .. } => {
                Some("Intervals and display sizes must be positive; the feed URL must be http(s)")
            }
            Self::DirectoryCreation { .. } => Some("Check permissions on ~/.stormwatch/"),
            Self::TerminalInit { .. } => Some("Try running in a different terminal, or use --headless"),
            _ => None,
        }
    }
}
