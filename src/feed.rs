//! Serde types for the ThingSpeak channel feed and the normalization of raw
//! feed entries into [`LocatorReading`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::geo::GeoPoint;
use crate::model::LocatorReading;

// Only the parts of the response we actually read are typed; ThingSpeak
// sends plenty of channel metadata that is irrelevant here.

#[derive(Debug, Deserialize)]
pub struct ChannelFeed {
    pub channel: ChannelInfo,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_entry_id: Option<i64>,
}

/// One timestamped set of field values. The positional `field1..field8`
/// slots land in `fields`; values arrive as strings (the source stringifies
/// numbers) but may also be numbers or null.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub created_at: DateTime<Utc>,
    pub entry_id: i64,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl FeedEntry {
    /// Numeric value of a slot. Absent, null, empty or non-numeric slots are
    /// simply not present; they never parse to zero or a propagating NaN.
    fn number(&self, slot: &str) -> Option<f64> {
        match self.fields.get(slot)? {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
        .filter(|x| x.is_finite())
    }

    /// Raw string value of a slot, kept for downstream validity checks.
    fn raw(&self, slot: &str) -> Option<String> {
        match self.fields.get(slot)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Which field slots hold this locator's latitude, longitude, speed and ETA.
/// Several locators share one wire record shape at different offsets, so the
/// mapping is configuration data rather than code.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    pub latitude: String,
    pub longitude: String,
    pub speed: String,
    pub eta: String,
}

impl FieldMapping {
    /// Contiguous slot layout starting at `field<start>`, the layout both
    /// stock locators use (1..4 and 5..8).
    pub fn slots(start: u8) -> Self {
        Self {
            latitude: format!("field{start}"),
            longitude: format!("field{}", start + 1),
            speed: format!("field{}", start + 2),
            eta: format!("field{}", start + 3),
        }
    }
}

/// Turn one raw feed entry into a canonical reading for the given locator.
/// Pure and total: malformed slots become absent fields, never errors.
pub fn normalize(entry: &FeedEntry, mapping: &FieldMapping, id: &str, name: &str) -> LocatorReading {
    let latitude = entry.number(&mapping.latitude);
    let longitude = entry.number(&mapping.longitude);
    let position = latitude
        .zip(longitude)
        .map(|(latitude, longitude)| GeoPoint::new(latitude, longitude));

    LocatorReading {
        id: id.to_string(),
        name: name.to_string(),
        position,
        speed_kmh: entry.number(&mapping.speed),
        raw_eta: entry.raw(&mapping.eta),
        last_update: Some(entry.created_at),
        distance_from_observer_km: None,
        calculated_eta_minutes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;

    fn entry(json: &str) -> FeedEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalizes_first_locator_layout() {
        let entry = entry(
            r#"{
                "created_at": "2025-05-10T08:30:00Z",
                "entry_id": 42,
                "field1": "6.97",
                "field2": "79.91",
                "field3": "40",
                "field4": "90"
            }"#,
        );

        let reading = normalize(&entry, &FieldMapping::slots(1), "locator1", "Locator 1");
        assert_eq!(reading.position, Some(GeoPoint::new(6.97, 79.91)));
        assert_eq!(reading.speed_kmh, Some(40.0));
        assert_eq!(reading.raw_eta.as_deref(), Some("90"));
        assert!(reading.last_update.is_some());

        let formatted = geo::format_eta(reading.raw_eta.as_deref().and_then(geo::parse_eta));
        assert_eq!(formatted, "1 hr 30 min");
    }

    #[test]
    fn normalizes_second_locator_layout() {
        let entry = entry(
            r#"{
                "created_at": "2025-05-10T08:30:00Z",
                "entry_id": 43,
                "field1": "6.97",
                "field2": "79.91",
                "field3": "40",
                "field4": "90",
                "field5": "6.05",
                "field6": "80.22",
                "field7": "25",
                "field8": "45"
            }"#,
        );

        let reading = normalize(&entry, &FieldMapping::slots(5), "locator2", "Locator 2");
        assert_eq!(reading.position, Some(GeoPoint::new(6.05, 80.22)));
        assert_eq!(reading.speed_kmh, Some(25.0));
        assert_eq!(reading.raw_eta.as_deref(), Some("45"));
    }

    #[test]
    fn malformed_slots_become_absent() {
        let entry = entry(
            r#"{
                "created_at": "2025-05-10T08:30:00Z",
                "entry_id": 44,
                "field1": "not-a-number",
                "field2": "",
                "field3": null,
                "field4": ""
            }"#,
        );

        let reading = normalize(&entry, &FieldMapping::slots(1), "locator1", "Locator 1");
        assert_eq!(reading.position, None);
        assert_eq!(reading.speed_kmh, None);
        assert_eq!(reading.raw_eta, None);
    }

    #[test]
    fn half_missing_position_is_absent() {
        // longitude slot missing entirely
        let entry = entry(
            r#"{
                "created_at": "2025-05-10T08:30:00Z",
                "entry_id": 45,
                "field1": "6.97",
                "field3": "40"
            }"#,
        );

        let reading = normalize(&entry, &FieldMapping::slots(1), "locator1", "Locator 1");
        assert_eq!(reading.position, None);
        assert_eq!(reading.speed_kmh, Some(40.0));
    }

    #[test]
    fn numeric_json_values_are_accepted() {
        let entry = entry(
            r#"{
                "created_at": "2025-05-10T08:30:00Z",
                "entry_id": 46,
                "field1": 6.97,
                "field2": 79.91,
                "field3": 40,
                "field4": 90
            }"#,
        );

        let reading = normalize(&entry, &FieldMapping::slots(1), "locator1", "Locator 1");
        assert_eq!(reading.position, Some(GeoPoint::new(6.97, 79.91)));
        assert_eq!(reading.raw_eta.as_deref(), Some("90"));
    }

    #[test]
    fn parses_full_channel_response() {
        let data: ChannelFeed = serde_json::from_str(
            r#"{
                "channel": {"id": 2957345, "name": "tracker", "last_entry_id": 42},
                "feeds": [{
                    "created_at": "2025-05-10T08:30:00Z",
                    "entry_id": 42,
                    "field1": "6.97",
                    "field2": "79.91"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(data.channel.id, 2957345);
        assert_eq!(data.feeds.len(), 1);
        assert_eq!(data.feeds[0].entry_id, 42);
    }
}
