//! Terminal dashboard for STORMWATCH.
//!
//! This crate runs the polling and rotation tasks and renders their output
//! with ratatui.
//!
//! ## Layout
//!
//! - Header with clock, feed status and mute indicator
//! - Rotating top bar with the selected alert, its expiration and counties
//! - Per-category counts
//! - "Latest Alerts:" list, new rows flashing for a few seconds
//!
//! ## Hotkeys
//!
//! - `m` - Mute / unmute audio cues
//! - `r` - Poll the feed now
//! - `?` or `h` - Help
//! - `Esc` - Close help
//! - `q` - Quit
//! - `Ctrl+C` - Force quit

pub mod app;
pub mod event;
pub mod list;
pub mod monitor;
pub mod theme;

pub use app::{App, AppResult};
pub use monitor::{
    DashboardSnapshot, MonitorHandle, MonitorOptions, PollCycle, RotationCycle, spawn_monitor,
};
