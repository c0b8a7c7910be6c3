//! Shared type definitions used across STORMWATCH crates.
//!
//! [`Alert`] is the decoded form of one feed entry. The feed client builds
//! alerts, the reconciliation engine consumes them, and the dashboard renders
//! them; none of those crates needs to know the wire format.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Stable identifier of an alert across polling cycles.
pub type AlertId = String;

/// Alert category derived from the event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tornado,
    Thunderstorm,
    Flood,
    Winter,
}

impl Category {
    /// All categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Tornado,
            Category::Thunderstorm,
            Category::Flood,
            Category::Winter,
        ]
    }

    /// Counter label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tornado => "TORNADO WARNINGS",
            Self::Thunderstorm => "SEVERE THUNDERSTORM WARNINGS",
            Self::Flood => "FLASH FLOOD WARNINGS",
            Self::Winter => "WINTER WEATHER WARNINGS",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tornado => write!(f, "tornado"),
            Self::Thunderstorm => write!(f, "thunderstorm"),
            Self::Flood => write!(f, "flood"),
            Self::Winter => write!(f, "winter"),
        }
    }
}

/// One active warning, watch or advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Stable identifier from the feed
    pub id: AlertId,
    /// Event as delivered by the feed (e.g. "Tornado Warning")
    pub event: String,
    /// Refined event name used for classification, priority and display
    /// (e.g. "Observed Tornado Warning"). Equal to `event` when nothing refines it.
    pub event_name: String,
    /// Semicolon-delimited "County, State" fragments
    pub area_desc: String,
    /// When the alert was issued
    pub sent: Option<DateTime<FixedOffset>>,
    /// When the alert expires
    pub expires: Option<DateTime<FixedOffset>>,
}

impl Alert {
    /// Create an alert whose refined event name equals the feed event.
    pub fn new(id: impl Into<AlertId>, event: impl Into<String>, area_desc: impl Into<String>) -> Self {
        let event = event.into();
        Self {
            id: id.into(),
            event_name: event.clone(),
            event,
            area_desc: area_desc.into(),
            sent: None,
            expires: None,
        }
    }

    /// Set the refined event name.
    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = event_name.into();
        self
    }

    /// Set the sent timestamp.
    pub fn with_sent(mut self, sent: DateTime<FixedOffset>) -> Self {
        self.sent = Some(sent);
        self
    }

    /// Set the expiration timestamp.
    pub fn with_expires(mut self, expires: DateTime<FixedOffset>) -> Self {
        self.expires = Some(expires);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        for category in Category::all() {
            assert!(category.label().ends_with("WARNINGS"));
        }
        assert_eq!(Category::Flood.label(), "FLASH FLOOD WARNINGS");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Thunderstorm.to_string(), "thunderstorm");
    }

    #[test]
    fn test_alert_builder() {
        let sent = DateTime::parse_from_rfc3339("2024-05-01T14:32:00-05:00").unwrap();
        let alert = Alert::new("a1", "Tornado Warning", "Harris, TX")
            .with_event_name("Observed Tornado Warning")
            .with_sent(sent);

        assert_eq!(alert.event, "Tornado Warning");
        assert_eq!(alert.event_name, "Observed Tornado Warning");
        assert_eq!(alert.sent, Some(sent));
        assert!(alert.expires.is_none());
    }

    #[test]
    fn test_alert_event_name_defaults_to_event() {
        let alert = Alert::new("a2", "Tornado Watch", "");
        assert_eq!(alert.event_name, alert.event);
    }
}
