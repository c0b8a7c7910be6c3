//! The "Latest Alerts:" list as the dashboard holds it.
//!
//! Each snapshot carries a [`ListDelta`] relative to the one before it. When
//! the dashboard has applied exactly the previous cycle the delta is applied
//! in place, which keeps insertion times for the flash highlight. If a cycle
//! was skipped (the watch channel only keeps the latest value) the list is
//! rebuilt from the snapshot's display list instead.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use stormwatch_engine::{ListChange, ListDelta, ListEntry};
use tracing::{debug, warn};

use crate::monitor::DashboardSnapshot;

/// One rendered row.
#[derive(Debug, Clone)]
pub struct ListRow {
    pub entry: ListEntry,
    pub inserted_at: Instant,
}

impl ListRow {
    /// Whether the row is still within its highlight window.
    pub fn is_flashing(&self, now: Instant, flash: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) < flash
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertList {
    rows: Vec<ListRow>,
    applied_cycle: Option<u64>,
}

impl AlertList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn applied_cycle(&self) -> Option<u64> {
        self.applied_cycle
    }

    /// Bring the list up to date with a snapshot. Returns whether it changed.
    pub fn sync(&mut self, snapshot: &DashboardSnapshot, now: Instant) -> bool {
        let display = &snapshot.result.display_list;
        match self.applied_cycle {
            Some(applied) if applied == snapshot.cycle => return false,
            Some(applied) if applied + 1 == snapshot.cycle => {
                self.apply_delta(&snapshot.result.delta, now);
                if !self.reorder(display) {
                    warn!(cycle = snapshot.cycle, "list delta out of step, rebuilding");
                    self.rebuild(display, now);
                }
            }
            _ => {
                debug!(cycle = snapshot.cycle, "rebuilding alert list");
                self.rebuild(display, now);
            }
        }
        self.applied_cycle = Some(snapshot.cycle);
        true
    }

    fn apply_delta(&mut self, delta: &ListDelta, now: Instant) {
        self.rows
            .retain(|row| !delta.removals.iter().any(|id| *id == row.entry.alert.id));

        for upsert in &delta.upserts {
            let existing = self
                .rows
                .iter_mut()
                .find(|row| row.entry.alert.id == upsert.entry.alert.id);
            match (upsert.change, existing) {
                (ListChange::Updated, Some(row)) => row.entry = upsert.entry.clone(),
                (_, Some(row)) => {
                    row.entry = upsert.entry.clone();
                    row.inserted_at = now;
                }
                (_, None) => self.rows.push(ListRow {
                    entry: upsert.entry.clone(),
                    inserted_at: now,
                }),
            }
        }
    }

    /// Sort rows into display order. False when the id sets disagree.
    fn reorder(&mut self, display: &[ListEntry]) -> bool {
        if self.rows.len() != display.len() {
            return false;
        }
        let positions: HashMap<&str, usize> = display
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.id(), position))
            .collect();
        if self
            .rows
            .iter()
            .any(|row| !positions.contains_key(row.entry.id()))
        {
            return false;
        }
        self.rows
            .sort_by_key(|row| positions.get(row.entry.id()).copied().unwrap_or(usize::MAX));
        true
    }

    fn rebuild(&mut self, display: &[ListEntry], now: Instant) {
        let previous: HashMap<String, Instant> = self
            .rows
            .drain(..)
            .map(|row| (row.entry.alert.id, row.inserted_at))
            .collect();
        self.rows = display
            .iter()
            .map(|entry| ListRow {
                inserted_at: previous.get(entry.id()).copied().unwrap_or(now),
                entry: entry.clone(),
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwatch_core::Alert;
    use stormwatch_engine::Reconciler;

    fn alert(id: &str, event: &str, minute: u32) -> Alert {
        let sent = chrono::DateTime::parse_from_rfc3339(&format!(
            "2024-05-01T14:{minute:02}:00-05:00"
        ))
        .unwrap();
        Alert::new(id, event, "Harris,TX").with_sent(sent)
    }

    fn snapshot(cycle: u64, reconciler: &mut Reconciler, alerts: Vec<Alert>) -> DashboardSnapshot {
        DashboardSnapshot {
            cycle,
            result: reconciler.reconcile(alerts),
            ..DashboardSnapshot::default()
        }
    }

    fn ids(list: &AlertList) -> Vec<&str> {
        list.rows().iter().map(|row| row.entry.id()).collect()
    }

    #[test]
    fn test_deltas_applied_in_sequence() {
        let mut reconciler = Reconciler::default();
        let mut list = AlertList::new();
        let start = Instant::now();

        assert!(list.sync(&DashboardSnapshot::default(), start));
        assert!(list.rows().is_empty());

        let first = snapshot(1, &mut reconciler, vec![alert("A", "Tornado Watch", 1)]);
        assert!(list.sync(&first, start));
        assert_eq!(ids(&list), vec!["A"]);

        let later = start + Duration::from_secs(3);
        let second = snapshot(
            2,
            &mut reconciler,
            vec![
                alert("A", "Tornado Watch", 1).with_event_name("PDS Tornado Warning"),
                alert("B", "Flash Flood Warning", 2),
            ],
        );
        assert!(list.sync(&second, later));
        assert_eq!(ids(&list), vec!["B", "A"]);

        // Updated rows keep their original insertion time
        let a = &list.rows()[1];
        assert_eq!(a.entry.text, "PDS Tornado Warning - Harris County, TX");
        assert_eq!(a.inserted_at, start);
        assert_eq!(list.rows()[0].inserted_at, later);

        // Same cycle again is a no-op
        assert!(!list.sync(&second, later));
    }

    #[test]
    fn test_removed_rows_disappear() {
        let mut reconciler = Reconciler::default();
        let mut list = AlertList::new();
        let now = Instant::now();

        list.sync(&snapshot(1, &mut reconciler, vec![alert("A", "Tornado Watch", 1)]), now);
        list.sync(&snapshot(2, &mut reconciler, Vec::new()), now);
        assert!(list.rows().is_empty());
    }

    #[test]
    fn test_skipped_cycle_rebuilds() {
        let mut reconciler = Reconciler::default();
        let mut list = AlertList::new();
        let start = Instant::now();

        list.sync(&snapshot(1, &mut reconciler, vec![alert("A", "Tornado Watch", 1)]), start);
        // Cycle 2 is never seen by the dashboard
        snapshot(2, &mut reconciler, vec![alert("B", "Tornado Watch", 2)]);
        let third = snapshot(
            3,
            &mut reconciler,
            vec![alert("A", "Tornado Watch", 1), alert("B", "Tornado Watch", 2)],
        );

        let later = start + Duration::from_secs(1);
        assert!(list.sync(&third, later));
        assert_eq!(ids(&list), vec!["B", "A"]);
        assert_eq!(list.applied_cycle(), Some(3));
        // A was already on screen
        assert_eq!(list.rows()[1].inserted_at, start);
    }

    #[test]
    fn test_flash_window() {
        let now = Instant::now();
        let row = ListRow {
            entry: ListEntry {
                alert: Alert::new("A", "Tornado Watch", ""),
                text: "Tornado Watch - ".to_string(),
                style_tag: Some("tornado-watch"),
            },
            inserted_at: now,
        };
        let flash = Duration::from_secs(5);
        assert!(row.is_flashing(now + Duration::from_secs(4), flash));
        assert!(!row.is_flashing(now + Duration::from_secs(5), flash));
    }
}
