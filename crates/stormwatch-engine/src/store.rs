//! Seen-alert tracking.
//!
//! [`AlertStore`] remembers the last event name reported for every active
//! alert id and turns each new feed payload into arrivals, event-name changes
//! and expirations.

use std::collections::{HashMap, HashSet};

use stormwatch_core::{Alert, AlertId};

/// Result of comparing a payload against the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreDiff {
    /// Alerts whose id was not in the store, in input order
    pub arrived: Vec<Alert>,
    /// Alerts whose event name changed since last seen, in input order
    pub upgraded: Vec<Alert>,
    /// Ids that left the feed, sorted
    pub expired: Vec<AlertId>,
}

impl StoreDiff {
    pub fn is_empty(&self) -> bool {
        self.arrived.is_empty() && self.upgraded.is_empty() && self.expired.is_empty()
    }
}

/// Alert id → last known event name.
#[derive(Debug, Clone, Default)]
pub struct AlertStore {
    seen: HashMap<AlertId, String>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked ids.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Last known event name for an id.
    pub fn event_name(&self, id: &str) -> Option<&str> {
        self.seen.get(id).map(String::as_str)
    }

    /// Diff `current` against the store, then record it.
    ///
    /// Any event-name change counts as an upgrade, including de-escalations.
    /// After the call the store holds exactly the ids in `current`.
    /// Must run once per polling cycle.
    pub fn diff(&mut self, current: &[Alert]) -> StoreDiff {
        let mut diff = StoreDiff::default();
        let mut next: HashMap<AlertId, String> = HashMap::with_capacity(current.len());

        for alert in current {
            // A repeated id within one payload is reported once
            if next.contains_key(&alert.id) {
                continue;
            }
            match self.seen.get(&alert.id) {
                None => diff.arrived.push(alert.clone()),
                Some(previous) if *previous != alert.event_name => {
                    diff.upgraded.push(alert.clone())
                }
                Some(_) => {}
            }
            next.insert(alert.id.clone(), alert.event_name.clone());
        }

        let current_ids: HashSet<&AlertId> = next.keys().collect();
        diff.expired = self
            .seen
            .keys()
            .filter(|id| !current_ids.contains(id))
            .cloned()
            .collect();
        diff.expired.sort();

        self.seen = next;
        diff
    }
}
