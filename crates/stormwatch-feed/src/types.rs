//! Wire types for the GeoJSON alerts document.
//!
//! Only the fields the dashboard reads are modeled. Features are decoded one
//! at a time so a single malformed entry cannot sink the whole payload.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;
use stormwatch_core::Alert;
use tracing::{debug, warn};

use crate::error::{FeedError, Result};
use crate::refine::refine_event_name;

/// Top-level response body.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    /// Raw features; absent or null means no active alerts
    #[serde(default)]
    pub features: Option<Vec<Value>>,
}

/// One alert feature.
#[derive(Debug, Deserialize)]
pub struct Feature {
    pub id: String,
    pub properties: Properties,
}

/// The subset of alert properties in use.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    pub event: String,
    #[serde(default)]
    pub area_desc: Option<String>,
    #[serde(default)]
    pub sent: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub parameters: Option<HashMap<String, Value>>,
}

impl Feature {
    /// Convert to the shared alert model, refining the event name.
    pub fn into_alert(self) -> Alert {
        let Properties {
            event,
            area_desc,
            sent,
            expires,
            parameters,
        } = self.properties;

        let event_name = match &parameters {
            Some(parameters) => refine_event_name(&event, parameters),
            None => event.clone(),
        };

        Alert {
            sent: parse_timestamp(&self.id, "sent", sent.as_deref()),
            expires: parse_timestamp(&self.id, "expires", expires.as_deref()),
            id: self.id,
            event,
            event_name,
            area_desc: area_desc.unwrap_or_default(),
        }
    }
}

fn parse_timestamp(id: &str, field: &str, raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at),
        Err(e) => {
            debug!(alert_id = id, field, value = raw, error = %e, "unparseable timestamp");
            None
        }
    }
}

/// Decode a response body into alerts.
///
/// Fails only when the body is not a JSON object. Features that do not match
/// [`Feature`] are logged and skipped.
pub fn decode_alerts(body: &[u8]) -> Result<Vec<Alert>> {
    let collection: FeatureCollection =
        serde_json::from_slice(body).map_err(|e| FeedError::Decode(e.to_string()))?;

    let features = collection.features.unwrap_or_default();
    let total = features.len();
    let alerts: Vec<Alert> = features
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value::<Feature>(raw) {
            Ok(feature) => Some(feature.into_alert()),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed feature");
                None
            }
        })
        .collect();

    debug!(total, decoded = alerts.len(), "decoded feed payload");
    Ok(alerts)
}
