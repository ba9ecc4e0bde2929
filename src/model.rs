use chrono::{DateTime, Utc};

use crate::geo::{self, GeoPoint};

/// One locator's most recent known state. Built fresh on every poll cycle
/// and replaced wholesale by the next one; absent fields mean the source
/// did not deliver a usable value, never that parsing failed loudly.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorReading {
    pub id: String,
    pub name: String,
    pub position: Option<GeoPoint>,
    pub speed_kmh: Option<f64>,
    /// ETA slot exactly as received, pre-formatting.
    pub raw_eta: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub distance_from_observer_km: Option<f64>,
    pub calculated_eta_minutes: Option<f64>,
}

impl LocatorReading {
    /// Attach distance and ETA relative to an observer position. Without an
    /// observer, or without a position of its own, the reading is returned
    /// unchanged; the calculated ETA additionally needs a positive speed.
    pub fn with_observer(mut self, observer: Option<GeoPoint>) -> Self {
        let Some((observer, position)) = observer.zip(self.position) else {
            return self;
        };

        self.distance_from_observer_km = geo::distance_km(observer, position);
        if self.speed_kmh.is_some_and(|x| x > 0.0) {
            self.calculated_eta_minutes =
                geo::eta_minutes(self.distance_from_observer_km, self.speed_kmh);
        }

        self
    }
}
