//! Text data panel for readings, mirroring what the map view's side panel
//! shows: position, speed, ETA, last update, and the observer-relative rows
//! when they are known.

use crate::geo;
use crate::model::LocatorReading;

pub fn render(reading: &LocatorReading) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("  {label:<18} {value}\n"));
    };

    line(
        "Latitude:",
        match reading.position {
            Some(p) => p.latitude.to_string(),
            None => "N/A".to_string(),
        },
    );
    line(
        "Longitude:",
        match reading.position {
            Some(p) => p.longitude.to_string(),
            None => "N/A".to_string(),
        },
    );
    line(
        "Speed:",
        match reading.speed_kmh {
            Some(s) => format!("{s} km/h"),
            None => "N/A".to_string(),
        },
    );
    line(
        "ETA:",
        geo::format_eta(reading.raw_eta.as_deref().and_then(geo::parse_eta)),
    );
    line(
        "Last update:",
        match reading.last_update {
            Some(t) => t.to_rfc3339(),
            None => "N/A".to_string(),
        },
    );

    if reading.distance_from_observer_km.is_some() {
        line(
            "Distance from you:",
            geo::format_distance(reading.distance_from_observer_km),
        );
        line("Calculated ETA:", geo::format_eta(reading.calculated_eta_minutes));
    }

    out
}

pub fn print(reading: &LocatorReading) {
    println!("{}", reading.name);
    print!("{}", render(reading));
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::geo::GeoPoint;

    fn reading() -> LocatorReading {
        LocatorReading {
            id: "locator1".to_string(),
            name: "Locator 1".to_string(),
            position: Some(GeoPoint::new(6.97, 79.91)),
            speed_kmh: Some(40.0),
            raw_eta: Some("90".to_string()),
            last_update: Some(Utc.with_ymd_and_hms(2025, 5, 10, 8, 30, 0).unwrap()),
            distance_from_observer_km: None,
            calculated_eta_minutes: None,
        }
    }

    #[test]
    fn renders_basic_rows() {
        let out = render(&reading());
        assert!(out.contains("6.97"));
        assert!(out.contains("79.91"));
        assert!(out.contains("40 km/h"));
        assert!(out.contains("1 hr 30 min"));
        assert!(!out.contains("Distance from you"));
    }

    #[test]
    fn renders_observer_rows_when_present() {
        let mut r = reading();
        r.distance_from_observer_km = Some(0.5);
        r.calculated_eta_minutes = Some(120.0);

        let out = render(&r);
        assert!(out.contains("500 m"));
        assert!(out.contains("2 hr"));
    }

    #[test]
    fn absent_fields_render_as_placeholders() {
        let mut r = reading();
        r.position = None;
        r.speed_kmh = None;
        r.raw_eta = None;
        r.last_update = None;

        let out = render(&r);
        assert!(out.contains("N/A"));
        assert!(out.contains("Unknown"));
    }
}
