//! Event-name classification.
//!
//! Pure lookups over the event vocabulary used by the alerts feed: category,
//! priority rank and style tag.

use stormwatch_core::Category;

/// Rank given to event names missing from [`PRIORITY_TABLE`].
pub const UNRANKED: u32 = u32::MAX;

/// Fixed priority ranks, 1 being the most severe.
pub const PRIORITY_TABLE: &[(&str, u32)] = &[
    ("Tornado Emergency", 1),
    ("PDS Tornado Warning", 2),
    ("Observed Tornado Warning", 3),
    ("Radar Indicated Tornado Warning", 4),
    ("Destructive Severe Thunderstorm Warning", 5),
    ("Considerable Severe Thunderstorm Warning", 6),
    ("Severe Thunderstorm Warning", 7),
    ("Tornado Watch", 8),
    ("Severe Thunderstorm Watch", 9),
    ("Flash Flood Warning", 10),
    ("Winter Weather Advisory", 11),
    ("Winter Storm Watch", 12),
    ("Winter Storm Warning", 13),
];

const STYLE_TAGS: &[(&str, &str)] = &[
    ("Radar Indicated Tornado Warning", "tornado-warning"),
    ("Observed Tornado Warning", "observed-tornado-warning"),
    ("PDS Tornado Warning", "pds-tornado-warning"),
    ("Tornado Emergency", "tornado-emergency"),
    ("Severe Thunderstorm Warning", "severe-thunderstorm-warning"),
    ("Considerable Severe Thunderstorm Warning", "severe-thunderstorm-considerable"),
    ("Destructive Severe Thunderstorm Warning", "pds-severe-thunderstorm-warning"),
    ("Flash Flood Warning", "flash-flood-warning"),
    ("Tornado Watch", "tornado-watch"),
    ("Severe Thunderstorm Watch", "severe-thunderstorm-watch"),
    ("Winter Weather Advisory", "winter-weather-advisory"),
    ("Winter Storm Watch", "winter-storm-watch"),
    ("Winter Storm Warning", "winter-storm-warning"),
    ("Ice Storm Warning", "winter-storm-warning"),
    ("Heavy Freezing Spray Warning", "winter-storm-warning"),
    ("Lake Effect Snow Warning", "winter-storm-warning"),
];

/// Map an event name to its category.
///
/// Checks run in order, so "Tornado" wins over any later keyword.
/// Matching is case-sensitive against the feed vocabulary.
pub fn classify(event_name: &str) -> Option<Category> {
    if event_name.contains("Tornado") {
        Some(Category::Tornado)
    } else if event_name.contains("Thunderstorm") {
        Some(Category::Thunderstorm)
    } else if event_name.contains("Flood") {
        Some(Category::Flood)
    } else if event_name.contains("Winter") {
        Some(Category::Winter)
    } else {
        None
    }
}

/// Priority rank of an event name; [`UNRANKED`] for names outside the table.
pub fn priority_rank(event_name: &str) -> u32 {
    PRIORITY_TABLE
        .iter()
        .find(|(name, _)| *name == event_name)
        .map(|(_, rank)| *rank)
        .unwrap_or(UNRANKED)
}

/// Styling tag for an event name, if the dashboard has one.
pub fn style_tag(event_name: &str) -> Option<&'static str> {
    STYLE_TAGS
        .iter()
        .find(|(name, _)| *name == event_name)
        .map(|(_, tag)| *tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_category() {
        assert_eq!(classify("Tornado Watch"), Some(Category::Tornado));
        assert_eq!(classify("PDS Tornado Warning"), Some(Category::Tornado));
        assert_eq!(classify("Tornado Emergency"), Some(Category::Tornado));
        assert_eq!(
            classify("Destructive Severe Thunderstorm Warning"),
            Some(Category::Thunderstorm)
        );
        assert_eq!(classify("Flash Flood Warning"), Some(Category::Flood));
        assert_eq!(classify("Flood Advisory"), Some(Category::Flood));
        assert_eq!(classify("Winter Storm Watch"), Some(Category::Winter));
    }

    #[test]
    fn test_classify_uncategorized() {
        assert_eq!(classify("Heat Advisory"), None);
        assert_eq!(classify("Ice Storm Warning"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify("tornado warning"), None);
        assert_eq!(classify("FLASH FLOOD WARNING"), None);
    }

    #[test]
    fn test_classify_tornado_takes_precedence() {
        // Keyword order decides mixed names
        assert_eq!(classify("Tornado Flood Statement"), Some(Category::Tornado));
        assert_eq!(classify("Thunderstorm Flood Statement"), Some(Category::Thunderstorm));
    }

    #[test]
    fn test_priority_rank_table() {
        assert_eq!(priority_rank("Tornado Emergency"), 1);
        assert_eq!(priority_rank("Radar Indicated Tornado Warning"), 4);
        assert_eq!(priority_rank("Tornado Watch"), 8);
        assert_eq!(priority_rank("Flash Flood Warning"), 10);
        assert_eq!(priority_rank("Winter Storm Warning"), 13);
    }

    #[test]
    fn test_priority_rank_unknown_sorts_last() {
        assert_eq!(priority_rank("Tornado Warning"), UNRANKED);
        assert_eq!(priority_rank("Special Weather Statement"), UNRANKED);
        assert!(priority_rank("Winter Storm Warning") < priority_rank("Heat Advisory"));
    }

    #[test]
    fn test_priority_ranks_are_unique_and_dense() {
        let mut ranks: Vec<u32> = PRIORITY_TABLE.iter().map(|(_, r)| *r).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=13).collect::<Vec<_>>());
    }

    #[test]
    fn test_style_tags() {
        assert_eq!(style_tag("Tornado Emergency"), Some("tornado-emergency"));
        assert_eq!(style_tag("Ice Storm Warning"), Some("winter-storm-warning"));
        assert_eq!(style_tag("Lake Effect Snow Warning"), Some("winter-storm-warning"));
        assert_eq!(style_tag("Heat Advisory"), None);
    }
}
