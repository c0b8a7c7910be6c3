//! Logging infrastructure for STORMWATCH.
//!
//! Structured logging using the `tracing` ecosystem.
//!
//! ## Features
//!
//! - JSON lines format for machine parsing
//! - File output to `~/.stormwatch/logs/stormwatch.log`
//! - Optional console output (disabled while the dashboard owns the terminal)
//! - `-v` flag support for verbose logging
//!
//! ## Example
//!
//! ```no_run
//! use stormwatch_core::logging;
//!
//! // Initialize logging (call once at startup)
//! let _guard = logging::init_logging(None, false, true).expect("logging init");
//!
//! tracing::info!("STORMWATCH started");
//! tracing::debug!(alert_id = "urn:oid:2.49.0.1.840.0.abc", "alert arrived");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Result, StormError};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the STORMWATCH logging system.
///
/// This sets up:
/// - File logging to `~/.stormwatch/logs/stormwatch.log` (JSON lines format)
/// - Console logging to stderr (human-readable format) when `console` is set
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.stormwatch/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
/// * `console` - Whether to also log to stderr. The terminal dashboard passes
///   `false` so log lines do not tear the alternate screen.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool, console: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| StormError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "stormwatch.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the verbose flag
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stormwatch={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(verbose)
            .with_line_number(verbose)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, console, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Root of the per-user STORMWATCH directory.
///
/// Returns `~/.stormwatch/`
pub fn stormwatch_home() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| StormError::Internal {
            message: "HOME environment variable not set".into(),
        })?;

    Ok(PathBuf::from(home).join(".stormwatch"))
}

/// Get the default log directory path.
///
/// Returns `~/.stormwatch/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(stormwatch_home()?.join("logs"))
}

/// Get the default log file path.
pub fn default_log_file() -> Result<PathBuf> {
    Ok(default_log_dir()?.join("stormwatch.log"))
}

/// Log a notification emitted by the reconciliation engine.
///
/// # Example
///
/// ```ignore
/// log_alert_event!("urn:oid:...", "new", event_name = "Tornado Watch");
/// ```
#[macro_export]
macro_rules! log_alert_event {
    ($alert_id:expr, $kind:expr) => {
        tracing::info!(
            target: "stormwatch::alert",
            alert_id = $alert_id,
            kind = $kind,
            "alert notification"
        )
    };
    ($alert_id:expr, $kind:expr, $($field:tt)*) => {
        tracing::info!(
            target: "stormwatch::alert",
            alert_id = $alert_id,
            kind = $kind,
            $($field)*,
            "alert notification"
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_log_dir() {
        // SAFETY: serialized test, nothing else reads HOME concurrently
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/test-home/.stormwatch/logs"));
    }

    #[test]
    #[serial]
    fn test_default_log_file() {
        // SAFETY: serialized test
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let file = default_log_file().unwrap();
        assert_eq!(
            file,
            PathBuf::from("/tmp/test-home/.stormwatch/logs/stormwatch.log")
        );
    }

    #[test]
    fn test_init_test_logging() {
        // Should not panic
        init_test_logging();
        log_alert_event!("alert-1", "new", event_name = "Tornado Watch");
    }
}
