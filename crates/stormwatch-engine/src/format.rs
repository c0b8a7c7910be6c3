//! Text formatting for list rows and the top bar.

use chrono::{DateTime, FixedOffset};

use stormwatch_core::Alert;

/// Counties shown before the "..." marker by default.
pub const DEFAULT_COUNTY_LIMIT: usize = 6;

/// Format a semicolon-delimited area description.
///
/// `"Harris,TX; Travis,TX"` becomes `"Harris County, TX; Travis County, TX"`.
/// Only the first `limit` fragments are kept; a trailing `"..."` marks the
/// rest. Fragments without a comma pass through unchanged.
pub fn format_counties(area_desc: &str, limit: usize) -> String {
    if area_desc.trim().is_empty() {
        return String::new();
    }

    let fragments: Vec<&str> = area_desc.split(';').map(str::trim).collect();
    let mut formatted: Vec<String> = fragments
        .iter()
        .take(limit)
        .map(|fragment| {
            let mut parts = fragment.split(',');
            match (parts.next(), parts.next()) {
                (Some(county), Some(state)) => {
                    format!("{} County, {}", county.trim(), state.trim())
                }
                _ => (*fragment).to_string(),
            }
        })
        .collect();

    if fragments.len() > limit {
        formatted.push("...".to_string());
    }
    formatted.join("; ")
}

/// Row text for the scrolling list: `"<event name> - <counties>"`.
pub fn list_text(alert: &Alert, county_limit: usize) -> String {
    format!(
        "{} - {}",
        alert.event_name,
        format_counties(&alert.area_desc, county_limit)
    )
}

/// Expiration line for the top bar, rendered in the issuing office's offset.
///
/// `2024-05-01T15:45:00-05:00` becomes `"Expires: 05/01/2024, 03:45 PM -05:00"`.
pub fn format_expiration(expires: Option<&DateTime<FixedOffset>>) -> String {
    match expires {
        Some(at) => format!("Expires: {}", at.format("%m/%d/%Y, %I:%M %p %:z")),
        None => String::new(),
    }
}
