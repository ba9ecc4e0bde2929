//! Distance and ETA math plus the display formatting shared by every
//! output path.

use serde::Deserialize;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both coordinates are real numbers. Out-of-range but finite values are
    /// not rejected; they pass through the distance math unchanged.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Great-circle distance between two points in kilometers, via the Haversine
/// formula. Returns None when any coordinate is not a finite number; a
/// missing point is distinct from zero distance.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> Option<f64> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }

    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let hav = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());

    Some(EARTH_RADIUS_KM * c)
}

/// Travel time in minutes for a distance at a constant speed, rounded half
/// away from zero. None when either input is absent or not finite, or when
/// speed is zero. Negative speed is not rejected.
pub fn eta_minutes(distance_km: Option<f64>, speed_kmh: Option<f64>) -> Option<f64> {
    let distance = distance_km.filter(|x| x.is_finite())?;
    let speed = speed_kmh.filter(|x| x.is_finite() && *x != 0.0)?;
    Some((distance / speed * 60.0).round())
}

/// Kilometer distance as a display string: meters below 1 km, one decimal of
/// kilometers otherwise.
pub fn format_distance(distance_km: Option<f64>) -> String {
    let Some(distance) = distance_km.filter(|x| x.is_finite()) else {
        return "Unknown".to_string();
    };

    if distance < 1.0 {
        format!("{} m", (distance * 1000.0).round() as i64)
    } else {
        format!("{distance:.1} km")
    }
}

/// Minute count as a display string, switching to hours past the hour mark.
/// Fractional minutes are truncated. Applied to both the raw source ETA and
/// the computed one.
pub fn format_eta(minutes: Option<f64>) -> String {
    let Some(minutes) = minutes.filter(|x| x.is_finite()) else {
        return "Unknown".to_string();
    };
    let minutes = minutes as i64;

    if minutes <= 60 {
        return format!("{minutes} min");
    }

    let hours = minutes / 60;
    let rem = minutes % 60;
    if rem == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {rem} min")
    }
}

/// Integer-parse semantics for the raw ETA slot: a decimal string loses its
/// fractional part, anything empty or non-numeric is None. The computed ETA
/// path rounds instead; both end up in [`format_eta`].
pub fn parse_eta(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|x| x.is_finite()).map(f64::trunc)
}
