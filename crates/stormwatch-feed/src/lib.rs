//! # stormwatch-feed
//!
//! Fetches the active alerts document and decodes it into [`Alert`] values.
//!
//! - [`FeedClient`] - reqwest client with the headers the API requires
//! - [`AlertSource`] - the seam the polling task depends on
//! - [`refine_event_name`] - derives the enumerated tornado and thunderstorm
//!   variants from alert parameters
//!
//! [`Alert`]: stormwatch_core::Alert

pub mod client;
pub mod error;
pub mod refine;
pub mod types;

pub use client::{AlertSource, FeedClient, GEO_JSON};
pub use error::{FeedError, Result};
pub use refine::refine_event_name;
pub use types::decode_alerts;
