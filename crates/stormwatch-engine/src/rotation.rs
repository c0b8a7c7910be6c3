//! Rotating top bar selection.
//!
//! The cursor is a bare index. It is not re-anchored to a particular alert
//! when the candidate list changes between ticks; it only wraps modulo the
//! current length.

use stormwatch_core::Alert;

use crate::classifier::style_tag;
use crate::format::{format_counties, format_expiration};

/// Result of one rotation step.
#[derive(Debug, PartialEq)]
pub struct Selection<'a> {
    pub selected: &'a Alert,
    pub next_cursor: usize,
}

/// Pick `candidates[cursor % len]` and the cursor for the next tick.
///
/// Returns `None` ("no active warnings") for an empty list.
pub fn next(candidates: &[Alert], cursor: usize) -> Option<Selection<'_>> {
    if candidates.is_empty() {
        return None;
    }
    let len = candidates.len();
    let index = cursor % len;
    Some(Selection {
        selected: &candidates[index],
        next_cursor: (index + 1) % len,
    })
}

/// Process-wide rotation cursor, owned by the rotation task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationCursor {
    position: usize,
}

impl RotationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Select the current candidate and advance exactly once.
    ///
    /// An empty list leaves the cursor where it was.
    pub fn advance<'a>(&mut self, candidates: &'a [Alert]) -> Option<&'a Alert> {
        let selection = next(candidates, self.position)?;
        self.position = selection.next_cursor;
        Some(selection.selected)
    }
}

/// What the rotating header shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TopBar {
    /// Nothing to rotate through
    #[default]
    NoActiveWarnings,
    /// One selected alert, pre-rendered
    Showing(TopBarAlert),
}

/// Pre-rendered fields of the selected alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopBarAlert {
    pub alert_id: String,
    pub event_name: String,
    pub style_tag: Option<&'static str>,
    pub expiration: String,
    pub counties: String,
}

impl TopBar {
    pub const NO_ACTIVE_WARNINGS: &'static str = "NO ACTIVE WARNINGS";

    /// Render the selected alert, or the empty state.
    pub fn from_selection(selected: Option<&Alert>, county_limit: usize) -> Self {
        match selected {
            None => Self::NoActiveWarnings,
            Some(alert) => Self::Showing(TopBarAlert {
                alert_id: alert.id.clone(),
                event_name: alert.event_name.clone(),
                style_tag: style_tag(&alert.event_name),
                expiration: format_expiration(alert.expires.as_ref()),
                counties: format_counties(&alert.area_desc, county_limit),
            }),
        }
    }

    /// Headline text: the event name or the empty-state message.
    pub fn headline(&self) -> &str {
        match self {
            Self::NoActiveWarnings => Self::NO_ACTIVE_WARNINGS,
            Self::Showing(alert) => &alert.event_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn candidates(n: usize) -> Vec<Alert> {
        (0..n)
            .map(|i| Alert::new(format!("id-{i}"), "Tornado Watch", "Harris, TX"))
            .collect()
    }

    #[test]
    fn test_next_cursor_sequence_wraps() {
        let list = candidates(3);
        let mut cursor = 0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(cursor);
            let selection = next(&list, cursor).unwrap();
            assert_eq!(selection.selected.id, format!("id-{cursor}"));
            cursor = selection.next_cursor;
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_next_empty_is_none() {
        assert!(next(&[], 0).is_none());
        assert!(next(&[], 7).is_none());
    }

    #[test]
    fn test_next_wraps_stale_cursor_after_shrink() {
        let list = candidates(2);
        let selection = next(&list, 5).unwrap();
        assert_eq!(selection.selected.id, "id-1");
        assert_eq!(selection.next_cursor, 0);
    }

    #[test]
    fn test_cursor_advances_once_per_call() {
        let mut cursor = RotationCursor::new();
        let list = candidates(3);

        assert_eq!(cursor.advance(&list).unwrap().id, "id-0");
        assert_eq!(cursor.advance(&list).unwrap().id, "id-1");
        assert_eq!(cursor.position(), 2);

        // List shrinks: no re-anchoring, just modulo
        let shorter = candidates(2);
        assert_eq!(cursor.advance(&shorter).unwrap().id, "id-0");
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_cursor_unchanged_on_empty() {
        let mut cursor = RotationCursor::new();
        cursor.advance(&candidates(3));
        assert!(cursor.advance(&[]).is_none());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_top_bar_rendering() {
        let expires = DateTime::parse_from_rfc3339("2024-05-01T21:15:00-05:00").unwrap();
        let alert = Alert::new("a", "Tornado Warning", "Harris,TX; Travis,TX")
            .with_event_name("PDS Tornado Warning")
            .with_expires(expires);

        let bar = TopBar::from_selection(Some(&alert), 6);
        match &bar {
            TopBar::Showing(shown) => {
                assert_eq!(shown.event_name, "PDS Tornado Warning");
                assert_eq!(shown.style_tag, Some("pds-tornado-warning"));
                assert_eq!(shown.expiration, "Expires: 05/01/2024, 09:15 PM -05:00");
                assert_eq!(shown.counties, "Harris County, TX; Travis County, TX");
            }
            TopBar::NoActiveWarnings => panic!("expected an alert"),
        }
        assert_eq!(bar.headline(), "PDS Tornado Warning");
    }

    #[test]
    fn test_top_bar_empty_state() {
        let bar = TopBar::from_selection(None, 6);
        assert_eq!(bar, TopBar::NoActiveWarnings);
        assert_eq!(bar.headline(), "NO ACTIVE WARNINGS");
    }
}
