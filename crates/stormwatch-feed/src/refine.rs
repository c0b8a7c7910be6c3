//! Event-name refinement from alert parameters.
//!
//! The feed reports every tornado warning as "Tornado Warning" and every
//! severe thunderstorm warning as "Severe Thunderstorm Warning". The damage
//! threat and detection parameters distinguish the variants shown on the
//! dashboard.

use std::collections::HashMap;

use serde_json::Value;

/// Refined name for a raw event, or the raw event when nothing applies.
pub fn refine_event_name(event: &str, parameters: &HashMap<String, Value>) -> String {
    let refined = match event {
        "Tornado Warning" => refine_tornado(parameters),
        "Severe Thunderstorm Warning" => refine_thunderstorm(parameters),
        _ => None,
    };
    refined.unwrap_or(event).to_string()
}

fn refine_tornado(parameters: &HashMap<String, Value>) -> Option<&'static str> {
    match parameter(parameters, "tornadoDamageThreat") {
        Some("CATASTROPHIC") => return Some("Tornado Emergency"),
        Some("CONSIDERABLE") => return Some("PDS Tornado Warning"),
        _ => {}
    }
    match parameter(parameters, "tornadoDetection") {
        Some("OBSERVED") => Some("Observed Tornado Warning"),
        Some("RADAR INDICATED") => Some("Radar Indicated Tornado Warning"),
        _ => None,
    }
}

fn refine_thunderstorm(parameters: &HashMap<String, Value>) -> Option<&'static str> {
    match parameter(parameters, "thunderstormDamageThreat") {
        Some("DESTRUCTIVE") => Some("Destructive Severe Thunderstorm Warning"),
        Some("CONSIDERABLE") => Some("Considerable Severe Thunderstorm Warning"),
        _ => None,
    }
}

/// First string value of a parameter. The API wraps values in arrays.
fn parameter<'a>(parameters: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
    match parameters.get(key)? {
        Value::String(value) => Some(value.trim()),
        Value::Array(values) => values.iter().find_map(Value::as_str).map(str::trim),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tornado_damage_threat_wins_over_detection() {
        let p = params(json!({
            "tornadoDamageThreat": ["CATASTROPHIC"],
            "tornadoDetection": ["OBSERVED"]
        }));
        assert_eq!(refine_event_name("Tornado Warning", &p), "Tornado Emergency");

        let p = params(json!({
            "tornadoDamageThreat": ["CONSIDERABLE"],
            "tornadoDetection": ["RADAR INDICATED"]
        }));
        assert_eq!(refine_event_name("Tornado Warning", &p), "PDS Tornado Warning");
    }

    #[test]
    fn test_tornado_detection() {
        let p = params(json!({ "tornadoDetection": ["OBSERVED"] }));
        assert_eq!(refine_event_name("Tornado Warning", &p), "Observed Tornado Warning");

        let p = params(json!({ "tornadoDetection": "RADAR INDICATED" }));
        assert_eq!(
            refine_event_name("Tornado Warning", &p),
            "Radar Indicated Tornado Warning"
        );
    }

    #[test]
    fn test_tornado_without_parameters_unchanged() {
        assert_eq!(
            refine_event_name("Tornado Warning", &HashMap::new()),
            "Tornado Warning"
        );
        let p = params(json!({ "tornadoDetection": ["POSSIBLE"] }));
        assert_eq!(refine_event_name("Tornado Warning", &p), "Tornado Warning");
    }

    #[test]
    fn test_thunderstorm_damage_threat() {
        let p = params(json!({ "thunderstormDamageThreat": ["DESTRUCTIVE"] }));
        assert_eq!(
            refine_event_name("Severe Thunderstorm Warning", &p),
            "Destructive Severe Thunderstorm Warning"
        );

        let p = params(json!({ "thunderstormDamageThreat": ["CONSIDERABLE"] }));
        assert_eq!(
            refine_event_name("Severe Thunderstorm Warning", &p),
            "Considerable Severe Thunderstorm Warning"
        );

        let p = params(json!({ "thunderstormDamageThreat": ["BASE"] }));
        assert_eq!(
            refine_event_name("Severe Thunderstorm Warning", &p),
            "Severe Thunderstorm Warning"
        );
    }

    #[test]
    fn test_other_events_pass_through() {
        let p = params(json!({ "tornadoDamageThreat": ["CATASTROPHIC"] }));
        assert_eq!(refine_event_name("Tornado Watch", &p), "Tornado Watch");
        assert_eq!(refine_event_name("Flash Flood Warning", &p), "Flash Flood Warning");
    }
}
