//! # stormwatch-core
//!
//! Core types, errors, and utilities shared by the STORMWATCH crates.
//!
//! This crate provides:
//! - [`StormError`] - Error types for configuration, I/O and terminal handling
//! - [`logging`] - Tracing setup and log management utilities
//! - [`types`] - The [`Alert`] model and its category vocabulary
//!
//! ## Example
//!
//! ```no_run
//! use stormwatch_core::{StormError, Result, logging};
//!
//! fn main() -> stormwatch_core::Result<()> {
//!     // Initialize logging
//!     let _guard = logging::init_logging(None, false, true)?;
//!
//!     let config_path = std::path::Path::new("~/.stormwatch/config.yaml");
//!     if !config_path.exists() {
//!         return Err(StormError::config_not_found(config_path));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export main types for convenience
pub use error::{Result, StormError};
pub use logging::{LogGuard, init_logging};
pub use types::{Alert, AlertId, Category};
