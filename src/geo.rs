//! Geodesic distance and clock-time helpers shared by all solving strategies.

use crate::problem::Coordinate;

/// Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Reference speed in km/h used for travel-time estimates.
pub const REFERENCE_SPEED_KMH: f64 = 50.0;

/// Calculate the great-circle distance between two coordinates in kilometers.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lng1 = a.lng.to_radians();
    let lat2 = b.lat.to_radians();
    let lng2 = b.lng.to_radians();

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Convert an HH:MM time string to seconds since midnight.
/// Unparseable input maps to 0.
pub fn time_to_seconds(time: &str) -> i64 {
    let mut parts = time.split(':');
    let hours = parts.next().and_then(|h| h.parse::<i64>().ok());
    let minutes = parts.next().and_then(|m| m.parse::<i64>().ok());

    match (hours, minutes) {
        (Some(h), Some(m)) => h * 3600 + m * 60,
        _ => 0,
    }
}

/// Convert seconds since midnight to an HH:MM time string.
pub fn seconds_to_time(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{:02}:{:02}", hours, minutes)
}

/// Convert minutes since midnight to an HH:MM time string.
pub fn minutes_to_time(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Round to two decimal places, the precision of solution totals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
