//! Per-cycle reconciliation of the active alert set.
//!
//! [`Reconciler`] owns the only mutable alert state in the system: the
//! [`AlertStore`] and the list that was last handed to the renderer. Each call
//! to [`Reconciler::reconcile`] consumes one feed payload and returns a fully
//! built [`Reconciliation`]; nothing is published until it returns.

use std::collections::{HashMap, HashSet};

use stormwatch_core::{Alert, AlertId, Category};
use tracing::debug;

use crate::classifier::{classify, priority_rank, style_tag};
use crate::format::{DEFAULT_COUNTY_LIMIT, list_text};
use crate::store::AlertStore;

/// Default number of rows in the scrolling list.
pub const DEFAULT_LIST_SIZE: usize = 10;

/// Raw event names that suppress flash flood warnings in the top bar.
const TORNADO_SUPPRESSORS: [&str; 2] = ["Tornado Warning", "Tornado Watch"];
const SUPPRESSED_EVENT: &str = "Flash Flood Warning";

/// Ordering of the scrolling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Most recently sent first
    #[default]
    Recency,
    /// Priority rank first, recency as tie-breaker
    Priority,
}

/// Tunables for [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub list_size: usize,
    pub county_limit: usize,
    pub order: ListOrder,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            list_size: DEFAULT_LIST_SIZE,
            county_limit: DEFAULT_COUNTY_LIMIT,
            order: ListOrder::Recency,
        }
    }
}

/// Why an alert needs an audio cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// First sighting of the id
    New,
    /// Event name differs from the last sighting, in either direction
    Upgraded,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Upgraded => "upgraded",
        }
    }
}

/// One alert that needs a cue.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub alert: Alert,
    pub kind: NotificationKind,
}

/// Active alerts per category. Uncategorized alerts are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub tornado: usize,
    pub thunderstorm: usize,
    pub flood: usize,
    pub winter: usize,
}

impl CategoryCounts {
    /// Count every alert by category.
    pub fn from_alerts<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Self {
        let mut counts = Self::default();
        for alert in alerts {
            match classify(&alert.event_name) {
                Some(Category::Tornado) => counts.tornado += 1,
                Some(Category::Thunderstorm) => counts.thunderstorm += 1,
                Some(Category::Flood) => counts.flood += 1,
                Some(Category::Winter) => counts.winter += 1,
                None => {}
            }
        }
        counts
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Tornado => self.tornado,
            Category::Thunderstorm => self.thunderstorm,
            Category::Flood => self.flood,
            Category::Winter => self.winter,
        }
    }

    pub fn total(&self) -> usize {
        self.tornado + self.thunderstorm + self.flood + self.winter
    }
}

/// One row of the scrolling list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub alert: Alert,
    /// `"<event name> - <counties>"`
    pub text: String,
    pub style_tag: Option<&'static str>,
}

impl ListEntry {
    fn new(alert: &Alert, county_limit: usize) -> Self {
        Self {
            text: list_text(alert, county_limit),
            style_tag: style_tag(&alert.event_name),
            alert: alert.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.alert.id
    }
}

/// Whether an upserted row is new to the list or replaces a rendered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUpsert {
    pub change: ListChange,
    pub entry: ListEntry,
}

/// Changes a renderer must apply to match the new list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDelta {
    /// Rows to insert or re-render, in list order
    pub upserts: Vec<ListUpsert>,
    /// Ids that dropped out of the list
    pub removals: Vec<AlertId>,
}

impl ListDelta {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.removals.is_empty()
    }
}

/// Everything produced by one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Scrolling list, truncated to `list_size`
    pub display_list: Vec<ListEntry>,
    pub counts: CategoryCounts,
    /// New and upgraded alerts, in recency order
    pub notifications: Vec<Notification>,
    /// Top bar rotation source after the exclusion rule, in recency order
    pub candidates: Vec<Alert>,
    pub delta: ListDelta,
    /// Ids that left the feed this cycle
    pub expired: Vec<AlertId>,
    /// Distinct active alerts
    pub active: usize,
}

impl Reconciliation {
    /// True when the rotation state is "no active warnings".
    pub fn no_active_warnings(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Owner of the seen-alert state; one per process.
#[derive(Debug, Default)]
pub struct Reconciler {
    store: AlertStore,
    displayed: Vec<ListEntry>,
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self {
            store: AlertStore::new(),
            displayed: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    /// Reconcile one feed payload.
    pub fn reconcile(&mut self, alerts: Vec<Alert>) -> Reconciliation {
        let active = sort_by_recency(alerts);
        let counts = CategoryCounts::from_alerts(&active);

        let diff = self.store.diff(&active);
        let notifications = notifications_in_order(&active, &diff.arrived, &diff.upgraded);

        let display_list = self.build_display_list(&active);
        let delta = list_delta(&self.displayed, &display_list);
        self.displayed = display_list.clone();

        let candidates = rotation_candidates(&active);

        debug!(
            active = active.len(),
            new = diff.arrived.len(),
            upgraded = diff.upgraded.len(),
            expired = diff.expired.len(),
            candidates = candidates.len(),
            "reconciled alerts"
        );

        Reconciliation {
            display_list,
            counts,
            notifications,
            candidates,
            delta,
            expired: diff.expired,
            active: active.len(),
        }
    }

    fn build_display_list(&self, active: &[Alert]) -> Vec<ListEntry> {
        let mut ordered: Vec<&Alert> = active.iter().collect();
        if self.options.order == ListOrder::Priority {
            // Stable: equal ranks keep recency order
            ordered.sort_by_key(|alert| priority_rank(&alert.event_name));
        }
        ordered
            .into_iter()
            .take(self.options.list_size)
            .map(|alert| ListEntry::new(alert, self.options.county_limit))
            .collect()
    }
}

/// Most recent first, one entry per id. Alerts without a sent time sort last.
pub fn sort_by_recency(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.sort_by(|a, b| b.sent.cmp(&a.sent));
    let mut seen = HashSet::with_capacity(alerts.len());
    alerts.retain(|alert| seen.insert(alert.id.clone()));
    alerts
}

/// Apply the flash flood exclusion rule.
///
/// When any alert's raw event is exactly "Tornado Warning" or "Tornado Watch",
/// every "Flash Flood Warning" is dropped. Counts and the list are unaffected.
pub fn rotation_candidates(active: &[Alert]) -> Vec<Alert> {
    let suppress = active
        .iter()
        .any(|alert| TORNADO_SUPPRESSORS.contains(&alert.event.as_str()));

    active
        .iter()
        .filter(|alert| !(suppress && alert.event == SUPPRESSED_EVENT))
        .cloned()
        .collect()
}

fn notifications_in_order(
    active: &[Alert],
    arrived: &[Alert],
    upgraded: &[Alert],
) -> Vec<Notification> {
    let arrived: HashSet<&str> = arrived.iter().map(|a| a.id.as_str()).collect();
    let upgraded: HashSet<&str> = upgraded.iter().map(|a| a.id.as_str()).collect();

    active
        .iter()
        .filter_map(|alert| {
            let kind = if arrived.contains(alert.id.as_str()) {
                NotificationKind::New
            } else if upgraded.contains(alert.id.as_str()) {
                NotificationKind::Upgraded
            } else {
                return None;
            };
            Some(Notification {
                alert: alert.clone(),
                kind,
            })
        })
        .collect()
}

fn list_delta(previous: &[ListEntry], current: &[ListEntry]) -> ListDelta {
    let previous_by_id: HashMap<&str, &ListEntry> =
        previous.iter().map(|entry| (entry.id(), entry)).collect();
    let current_ids: HashSet<&str> = current.iter().map(ListEntry::id).collect();

    let upserts = current
        .iter()
        .filter_map(|entry| match previous_by_id.get(entry.id()) {
            None => Some(ListUpsert {
                change: ListChange::Inserted,
                entry: entry.clone(),
            }),
            Some(old) if old.text != entry.text || old.style_tag != entry.style_tag => {
                Some(ListUpsert {
                    change: ListChange::Updated,
                    entry: entry.clone(),
                })
            }
            Some(_) => None,
        })
        .collect();

    let removals = previous
        .iter()
        .filter(|entry| !current_ids.contains(entry.id()))
        .map(|entry| entry.alert.id.clone())
        .collect();

    ListDelta { upserts, removals }
}
