//! # stormwatch-engine
//!
//! The alert pipeline between the feed and the screen.
//!
//! - [`classifier`] - category, priority rank and style tag lookups
//! - [`store`] - seen-alert tracking across polling cycles
//! - [`reconcile`] - one cycle from raw alerts to list, counts and cues
//! - [`rotation`] - the rotating top bar
//! - [`format`] - county and expiration text

pub mod classifier;
pub mod format;
pub mod reconcile;
pub mod rotation;
pub mod store;

pub use classifier::{PRIORITY_TABLE, UNRANKED, classify, priority_rank, style_tag};
pub use format::{DEFAULT_COUNTY_LIMIT, format_counties, format_expiration, list_text};
pub use reconcile::{
    CategoryCounts, DEFAULT_LIST_SIZE, ListChange, ListDelta, ListEntry, ListOrder, ListUpsert,
    Notification, NotificationKind, ReconcileOptions, Reconciler, Reconciliation,
    rotation_candidates, sort_by_recency,
};
pub use rotation::{RotationCursor, Selection, TopBar, TopBarAlert, next};
pub use store::{AlertStore, StoreDiff};
